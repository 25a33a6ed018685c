//! Notebook model: an ordered list of cell editors.

use crate::editor::{CellEditor, EditorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the code payload that tells the kernel which cells survive.
pub const CELL_REMOVAL_EVENT: &str = "cell_removal_event";

/// Identifier of a notebook cell, assigned by the notebook model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CellId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A structural change to the notebook's cell list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookChange {
    /// Cells were inserted starting at `index`.
    Added { index: usize, ids: Vec<CellId> },
    /// Cells were removed.
    Removed { ids: Vec<CellId> },
    /// A cell moved from one index to another.
    Moved { from: usize, to: usize },
}

/// The cells of one notebook in display order.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    cells: Vec<CellEditor>,
    /// Next editor ID to assign.
    next_id: EditorId,
}

impl Notebook {
    /// Creates an empty notebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell and returns the ID of its editor.
    pub fn push_cell(&mut self, cell_id: impl Into<CellId>, source: &str) -> EditorId {
        let index = self.cells.len();
        self.insert_cell(index, cell_id, source)
    }

    /// Inserts a cell at `index` (clamped) and returns the ID of its editor.
    pub fn insert_cell(
        &mut self,
        index: usize,
        cell_id: impl Into<CellId>,
        source: &str,
    ) -> EditorId {
        let id = self.next_id;
        self.next_id += 1;

        let index = index.min(self.cells.len());
        self.cells.insert(index, CellEditor::new(id, cell_id, source));
        id
    }

    /// Removes every cell whose ID is in `ids`, disposing its editor.
    pub fn remove_cells(&mut self, ids: &[CellId]) -> NotebookChange {
        let mut removed = Vec::new();
        self.cells.retain(|cell| {
            if ids.contains(cell.cell_id()) {
                removed.push(cell.cell_id().clone());
                false
            } else {
                true
            }
        });
        NotebookChange::Removed { ids: removed }
    }

    /// Moves the cell at `from` to `to`. Out-of-range indices are ignored.
    pub fn move_cell(&mut self, from: usize, to: usize) -> Option<NotebookChange> {
        if from >= self.cells.len() || to >= self.cells.len() {
            return None;
        }
        let cell = self.cells.remove(from);
        self.cells.insert(to, cell);
        Some(NotebookChange::Moved { from, to })
    }

    /// Returns the editors in display order.
    pub fn editors(&self) -> &[CellEditor] {
        &self.cells
    }

    /// Returns the editors in display order, mutably.
    pub fn editors_mut(&mut self) -> &mut [CellEditor] {
        &mut self.cells
    }

    /// Finds the editor of a cell.
    pub fn cell(&self, cell_id: &CellId) -> Option<&CellEditor> {
        self.cells.iter().find(|cell| cell.cell_id() == cell_id)
    }

    /// Finds an editor by its ID.
    pub fn editor(&self, id: EditorId) -> Option<&CellEditor> {
        self.cells.iter().find(|cell| cell.id() == id)
    }

    /// Finds an editor by its ID, mutably.
    pub fn editor_mut(&mut self, id: EditorId) -> Option<&mut CellEditor> {
        self.cells.iter_mut().find(|cell| cell.id() == id)
    }

    /// Returns the IDs of all cells in display order.
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.iter().map(|cell| cell.cell_id().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Builds the kernel code payload announcing the cells that still exist,
    /// e.g. `cell_removal_event, ["a","c"]`.
    pub fn cell_removal_code(&self) -> String {
        cell_removal_code(&self.cell_ids())
    }
}

/// Formats the cell-removal payload for a list of surviving cells.
pub fn cell_removal_code(surviving: &[CellId]) -> String {
    let ids = serde_json::Value::Array(
        surviving
            .iter()
            .map(|id| serde_json::Value::String(id.as_str().to_string()))
            .collect(),
    );
    format!("{}, {}", CELL_REMOVAL_EVENT, ids)
}
