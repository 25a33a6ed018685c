//! Cell source text backed by ropey.

use ropey::Rope;

/// The source text of one notebook cell.
///
/// Offsets are character indices, lines are 0-indexed. This is the line
/// table decorations are resolved against.
#[derive(Debug, Clone, Default)]
pub struct CellText {
    rope: Rope,
}

impl CellText {
    /// Creates an empty cell text.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a cell text from a string.
    pub fn from_source(source: &str) -> Self {
        Self {
            rope: Rope::from_str(source),
        }
    }

    /// Returns the total number of characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines. An empty text still has one line.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts a string at the given character index, clamped to the end.
    /// Returns the index the text was actually inserted at.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> usize {
        let idx = char_idx.min(self.len_chars());
        self.rope.insert(idx, text);
        idx
    }

    /// Removes the characters in `start..end`, clamped to the text.
    /// Returns the clamped range that was removed.
    pub fn remove(&mut self, start: usize, end: usize) -> (usize, usize) {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
            (start, end)
        } else {
            (start, start)
        }
    }

    /// Returns the length of a line in characters, excluding its line break.
    pub fn line_len_chars(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Returns the character index where `line` starts, or `None` if the
    /// line does not exist.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.len_lines()).then(|| self.rope.line_to_char(line))
    }

    /// Converts a (line, column) position to a character index.
    ///
    /// The column is clamped to the end of the line so a resolved offset
    /// never crosses into the next line.
    pub fn offset_of(&self, line: usize, col: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        Some(start + col.min(self.line_len_chars(line)))
    }

    /// Returns the line at the given index without its line break.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.len_lines() {
            return None;
        }
        let mut s = self.rope.line(line).to_string();
        if s.ends_with('\n') {
            s.pop();
            if s.ends_with('\r') {
                s.pop();
            }
        }
        Some(s)
    }

    /// Returns the characters in `start..end` as a string.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Returns the full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}
