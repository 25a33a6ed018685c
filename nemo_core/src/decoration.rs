//! Mark decorations and the per-editor decoration store.

use crate::editor::{CellEditor, EditorId};
use crate::theme::{Theme, TokenClass};
use std::collections::HashSet;

/// A visual style applied to `from..to` (character offsets) in one editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub class: TokenClass,
}

impl Decoration {
    pub fn new(from: usize, to: usize, class: TokenClass) -> Self {
        Self { from, to, class }
    }

    /// The CSS class rendered for this decoration.
    pub fn css_class(&self) -> &'static str {
        self.class.css_class()
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}

/// The decoration set of one editor.
///
/// Every [`DecorationStore::replace`] swaps the whole set at once, so a
/// reader never observes a partially updated set. Between replacements the
/// set follows text edits.
#[derive(Debug, Clone, Default)]
pub struct DecorationStore {
    decorations: Vec<Decoration>,
    /// Incremented on every replacement.
    generation: u64,
}

impl DecorationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the full decoration set.
    pub fn replace(&mut self, mut decorations: Vec<Decoration>) {
        decorations.sort_by_key(|d| (d.from, d.to));
        self.decorations = decorations;
        self.generation += 1;
    }

    /// Removes all decorations.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Returns the decorations ordered by start offset.
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the class of the decoration covering `offset`, if any.
    pub fn class_at(&self, offset: usize) -> Option<TokenClass> {
        self.decorations
            .iter()
            .find(|d| offset >= d.from && offset < d.to)
            .map(|d| d.class)
    }

    /// Maps the set through an insertion of `len` characters at `at`.
    ///
    /// A decoration starting exactly at the insertion point moves with the
    /// inserted text; one ending there does not grow.
    pub fn map_insert(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        for d in &mut self.decorations {
            if d.from >= at {
                d.from += len;
            }
            if d.to > at {
                d.to += len;
            }
        }
    }

    /// Maps the set through removal of `start..end`. Positions inside the
    /// removed span collapse to `start`; decorations left empty are dropped.
    pub fn map_remove(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let removed = end - start;
        let map = |pos: usize| {
            if pos <= start {
                pos
            } else if pos >= end {
                pos - removed
            } else {
                start
            }
        };
        for d in &mut self.decorations {
            d.from = map(d.from);
            d.to = map(d.to);
        }
        self.decorations.retain(|d| !d.is_empty());
    }
}

/// Tracks which editors already carry the decoration layer and theme.
///
/// Installation happens once per editor identity; later cycles only
/// replace decoration sets.
#[derive(Debug, Clone)]
pub struct DecorationRegistry {
    installed: HashSet<EditorId>,
    theme: Theme,
}

impl Default for DecorationRegistry {
    fn default() -> Self {
        Self::new(Theme::nemo())
    }
}

impl DecorationRegistry {
    pub fn new(theme: Theme) -> Self {
        Self {
            installed: HashSet::new(),
            theme,
        }
    }

    /// Installs the decoration layer on `editor` if it does not carry one.
    /// Returns true if this call performed the installation.
    ///
    /// The editor's own state decides; a new editor reusing a known ID
    /// still gets its layer.
    pub fn ensure_installed(&mut self, editor: &mut CellEditor) -> bool {
        self.installed.insert(editor.id());
        if editor.has_decoration_layer() {
            return false;
        }
        log::debug!("Installing decoration layer on editor {}", editor.id());
        editor.install_decorations(self.theme.clone());
        true
    }

    pub fn is_installed(&self, id: EditorId) -> bool {
        self.installed.contains(&id)
    }

    /// Drops tracking for a disposed editor.
    pub fn forget(&mut self, id: EditorId) {
        self.installed.remove(&id);
    }

    /// Keeps tracking only for editors that still exist.
    pub fn retain_editors(&mut self, live: &[EditorId]) {
        self.installed.retain(|id| live.contains(id));
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deco(from: usize, to: usize) -> Decoration {
        Decoration::new(from, to, TokenClass::Keyword)
    }

    #[test]
    fn test_replace_swaps_whole_set() {
        let mut store = DecorationStore::new();
        store.replace(vec![deco(5, 8), deco(0, 3)]);
        assert_eq!(store.decorations(), &[deco(0, 3), deco(5, 8)]);
        assert_eq!(store.generation(), 1);

        store.replace(vec![deco(1, 2)]);
        assert_eq!(store.decorations(), &[deco(1, 2)]);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_class_at() {
        let mut store = DecorationStore::new();
        store.replace(vec![Decoration::new(2, 4, TokenClass::String)]);
        assert_eq!(store.class_at(2), Some(TokenClass::String));
        assert_eq!(store.class_at(4), None);
    }

    #[test]
    fn test_map_insert() {
        let mut store = DecorationStore::new();
        store.replace(vec![deco(0, 3), deco(3, 5), deco(6, 9)]);
        store.map_insert(3, 2);
        assert_eq!(store.decorations(), &[deco(0, 3), deco(5, 7), deco(8, 11)]);
    }

    #[test]
    fn test_map_insert_inside_decoration_grows_it() {
        let mut store = DecorationStore::new();
        store.replace(vec![deco(2, 6)]);
        store.map_insert(4, 3);
        assert_eq!(store.decorations(), &[deco(2, 9)]);
    }

    #[test]
    fn test_map_remove() {
        let mut store = DecorationStore::new();
        store.replace(vec![deco(0, 3), deco(4, 6), deco(8, 12)]);
        store.map_remove(2, 7);
        // 0..3 shrinks, 4..6 vanishes, 8..12 shifts left by five.
        assert_eq!(store.decorations(), &[deco(0, 2), deco(3, 7)]);
    }

    #[test]
    fn test_registry_installs_once() {
        let mut registry = DecorationRegistry::default();
        let mut editor = CellEditor::new(7, "cell-a", "a(1).");
        assert!(registry.ensure_installed(&mut editor));
        assert!(!registry.ensure_installed(&mut editor));
        assert!(registry.is_installed(7));
        assert!(editor.has_decoration_layer());

        registry.forget(7);
        assert!(!registry.is_installed(7));
    }

    #[test]
    fn test_registry_installs_on_new_editor_with_reused_id() {
        let mut registry = DecorationRegistry::default();
        let mut first = CellEditor::new(0, "cell-a", "a(1).");
        assert!(registry.ensure_installed(&mut first));

        let mut second = CellEditor::new(0, "cell-b", "b(1).");
        assert!(registry.ensure_installed(&mut second));
        assert!(second.has_decoration_layer());
        assert!(registry.is_installed(0));
    }
}
