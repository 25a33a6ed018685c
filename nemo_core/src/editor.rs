//! The editor of one notebook cell.

use crate::buffer::CellText;
use crate::decoration::{Decoration, DecorationStore};
use crate::notebook::CellId;
use crate::theme::Theme;

/// Unique identifier for an editor instance.
pub type EditorId = usize;

/// Decoration support installed lazily on an editor.
#[derive(Debug, Clone)]
struct DecorationLayer {
    store: DecorationStore,
    theme: Theme,
}

/// Editor state for a single cell: its text and, once installed, its
/// decoration layer.
#[derive(Debug, Clone)]
pub struct CellEditor {
    id: EditorId,
    cell_id: CellId,
    text: CellText,
    layer: Option<DecorationLayer>,
}

impl CellEditor {
    /// Creates an editor for `cell_id` holding `source`.
    pub fn new(id: EditorId, cell_id: impl Into<CellId>, source: &str) -> Self {
        Self {
            id,
            cell_id: cell_id.into(),
            text: CellText::from_source(source),
            layer: None,
        }
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn cell_id(&self) -> &CellId {
        &self.cell_id
    }

    pub fn text(&self) -> &CellText {
        &self.text
    }

    /// Returns the number of lines in the cell.
    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Replaces the whole cell source. Existing decorations no longer
    /// refer to valid text and are cleared.
    pub fn set_source(&mut self, source: &str) {
        self.text = CellText::from_source(source);
        if let Some(layer) = &mut self.layer {
            layer.store.clear();
        }
    }

    /// Inserts text at a character offset, mapping decorations through the
    /// change.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let at = self.text.insert(char_idx, text);
        if let Some(layer) = &mut self.layer {
            layer.store.map_insert(at, text.chars().count());
        }
    }

    /// Removes `start..end`, mapping decorations through the change.
    pub fn remove(&mut self, start: usize, end: usize) {
        let (start, end) = self.text.remove(start, end);
        if let Some(layer) = &mut self.layer {
            layer.store.map_remove(start, end);
        }
    }

    /// Resolves a (line, column) position against the current line table.
    pub fn resolve(&self, line: usize, col: usize) -> Option<usize> {
        self.text.offset_of(line, col)
    }

    /// Installs the decoration layer and theme. Reinstalling keeps the
    /// current theme and decorations.
    pub fn install_decorations(&mut self, theme: Theme) {
        if self.layer.is_none() {
            self.layer = Some(DecorationLayer {
                store: DecorationStore::new(),
                theme,
            });
        }
    }

    pub fn has_decoration_layer(&self) -> bool {
        self.layer.is_some()
    }

    /// Replaces the decoration set in one update.
    ///
    /// Returns false if the decoration layer has not been installed.
    pub fn set_decorations(&mut self, decorations: Vec<Decoration>) -> bool {
        match &mut self.layer {
            Some(layer) => {
                layer.store.replace(decorations);
                true
            }
            None => {
                log::warn!("Editor {} has no decoration layer", self.id);
                false
            }
        }
    }

    /// Returns the current decorations (empty before installation).
    pub fn decorations(&self) -> &[Decoration] {
        self.layer
            .as_ref()
            .map(|layer| layer.store.decorations())
            .unwrap_or(&[])
    }

    /// Returns the decoration store, if installed.
    pub fn decoration_store(&self) -> Option<&DecorationStore> {
        self.layer.as_ref().map(|layer| &layer.store)
    }

    /// Returns the installed theme.
    pub fn theme(&self) -> Option<&Theme> {
        self.layer.as_ref().map(|layer| &layer.theme)
    }
}
