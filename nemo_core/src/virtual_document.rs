//! The virtual document: all cells concatenated for the language server.
//!
//! Cell `i` occupies virtual lines `[offset_i, offset_i + lines_i)`, and
//! consecutive cells are separated by `gap` empty lines.

use crate::editor::EditorId;
use crate::notebook::Notebook;

/// Separator lines between two cells in the virtual document.
pub const DEFAULT_CELL_GAP: usize = 2;

/// One cell's block of virtual lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub editor: EditorId,
    pub offset: usize,
    pub lines: usize,
}

impl Block {
    /// Returns true if the virtual line lies inside this block.
    pub fn contains(&self, line: usize) -> bool {
        line >= self.offset && line < self.offset + self.lines
    }
}

/// Snapshot of a notebook as one logical document.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    blocks: Vec<Block>,
    text: String,
}

impl VirtualDocument {
    /// Lays out the notebook's cells with `gap` separator lines.
    pub fn new(notebook: &Notebook, gap: usize) -> Self {
        let mut blocks = Vec::with_capacity(notebook.len());
        let mut text = String::new();
        let separator = "\n".repeat(gap + 1);
        let mut offset = 0;

        for (i, editor) in notebook.editors().iter().enumerate() {
            if i > 0 {
                text.push_str(&separator);
            }
            text.push_str(&editor.text().text());

            let lines = editor.line_count();
            blocks.push(Block {
                editor: editor.id(),
                offset,
                lines,
            });
            offset += lines + gap;
        }

        Self { blocks, text }
    }

    /// Returns the blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the editor owning a virtual line. Separator lines belong to
    /// no editor.
    pub fn editor_at_virtual_line(&self, line: usize) -> Option<EditorId> {
        self.to_cell_position(line).map(|(editor, _)| editor)
    }

    /// Converts a virtual line to (editor, line within the cell).
    pub fn to_cell_position(&self, line: usize) -> Option<(EditorId, usize)> {
        self.blocks
            .iter()
            .find(|block| block.contains(line))
            .map(|block| (block.editor, line - block.offset))
    }

    /// Converts a cell line back to its virtual line.
    pub fn to_virtual_line(&self, editor: EditorId, line: usize) -> Option<usize> {
        self.blocks
            .iter()
            .find(|block| block.editor == editor && line < block.lines)
            .map(|block| block.offset + line)
    }

    /// One past the last line of the last cell.
    pub fn last_virtual_line(&self) -> usize {
        self.blocks
            .last()
            .map(|block| block.offset + block.lines)
            .unwrap_or(0)
    }

    /// Collects the editors by scanning the virtual lines in order, each
    /// editor listed once.
    pub fn editor_order(&self) -> Vec<EditorId> {
        let mut order: Vec<EditorId> = Vec::new();
        for line in 0..self.last_virtual_line() {
            if let Some(editor) = self.editor_at_virtual_line(line) {
                if order.last() != Some(&editor) {
                    order.push(editor);
                }
            }
        }
        order
    }

    /// The concatenated source sent to the language server.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notebook() -> Notebook {
        let mut notebook = Notebook::new();
        notebook.push_cell("a", "p(1).\np(2).\np(3).");
        notebook.push_cell("b", "q(X) :- p(X).\n@output q.");
        notebook
    }

    #[test]
    fn test_block_offsets() {
        let doc = VirtualDocument::new(&notebook(), DEFAULT_CELL_GAP);
        let offsets: Vec<(usize, usize)> =
            doc.blocks().iter().map(|b| (b.offset, b.lines)).collect();
        assert_eq!(offsets, vec![(0, 3), (5, 2)]);
        assert_eq!(doc.last_virtual_line(), 7);
    }

    #[test]
    fn test_editor_at_virtual_line() {
        let doc = VirtualDocument::new(&notebook(), DEFAULT_CELL_GAP);
        assert_eq!(doc.editor_at_virtual_line(2), Some(0));
        assert_eq!(doc.editor_at_virtual_line(3), None);
        assert_eq!(doc.editor_at_virtual_line(4), None);
        assert_eq!(doc.to_cell_position(6), Some((1, 1)));
        assert_eq!(doc.editor_at_virtual_line(7), None);
        assert_eq!(doc.to_virtual_line(1, 1), Some(6));
    }

    #[test]
    fn test_text_line_layout_matches_blocks() {
        let doc = VirtualDocument::new(&notebook(), DEFAULT_CELL_GAP);
        let lines: Vec<&str> = doc.text().split('\n').collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[5], "q(X) :- p(X).");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_editor_order() {
        let mut nb = notebook();
        nb.push_cell("c", "");
        nb.move_cell(2, 0);
        let doc = VirtualDocument::new(&nb, DEFAULT_CELL_GAP);
        assert_eq!(doc.editor_order(), vec![2, 0, 1]);
    }

    #[test]
    fn test_empty_notebook() {
        let doc = VirtualDocument::new(&Notebook::new(), DEFAULT_CELL_GAP);
        assert_eq!(doc.last_virtual_line(), 0);
        assert!(doc.editor_order().is_empty());
        assert_eq!(doc.text(), "");
    }
}
