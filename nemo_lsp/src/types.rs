//! Highlight types exchanged between the decoder, the partitioner and the
//! editors.

use nemo_core::TokenClass;

/// One raw entry of a repurposed `textDocument/documentHighlight` response.
///
/// The Nemo language server packs a semantic token into a highlight range:
///
/// ```text
/// range.start = { line: delta_line, character: delta_start }
/// range.end   = { line: token_type, character: length }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHighlight {
    pub line_delta: u32,
    pub char_delta: u32,
    pub type_code: u32,
    pub length: u32,
}

impl From<&lsp_types::DocumentHighlight> for RawHighlight {
    fn from(highlight: &lsp_types::DocumentHighlight) -> Self {
        let range = highlight.range;
        Self {
            line_delta: range.start.line,
            char_delta: range.start.character,
            type_code: range.end.line,
            length: range.end.character,
        }
    }
}

impl From<RawHighlight> for lsp_types::DocumentHighlight {
    fn from(raw: RawHighlight) -> Self {
        Self {
            range: lsp_types::Range {
                start: lsp_types::Position::new(raw.line_delta, raw.char_delta),
                end: lsp_types::Position::new(raw.type_code, raw.length),
            },
            kind: None,
        }
    }
}

/// A decoded single-line highlight in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub start_line: usize,
    pub start_char: usize,
    pub end_line: usize,
    pub end_char: usize,
    /// Type code as sent by the server.
    pub type_code: u32,
    pub class: TokenClass,
}

impl HighlightRange {
    /// Shifts both lines up by `offset`.
    pub fn rebased(mut self, offset: usize) -> Self {
        self.start_line -= offset;
        self.end_line -= offset;
        self
    }

    /// Returns the start as (line, character).
    pub fn start(&self) -> (usize, usize) {
        (self.start_line, self.start_char)
    }

    /// Returns the end as (line, character).
    pub fn end(&self) -> (usize, usize) {
        (self.end_line, self.end_char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_from_document_highlight() {
        let highlight = lsp_types::DocumentHighlight {
            range: lsp_types::Range {
                start: lsp_types::Position::new(1, 4),
                end: lsp_types::Position::new(3, 6),
            },
            kind: Some(lsp_types::DocumentHighlightKind::TEXT),
        };
        let raw = RawHighlight::from(&highlight);
        assert_eq!(
            raw,
            RawHighlight {
                line_delta: 1,
                char_delta: 4,
                type_code: 3,
                length: 6,
            }
        );
    }

    #[test]
    fn test_rebased() {
        let range = HighlightRange {
            start_line: 6,
            start_char: 2,
            end_line: 6,
            end_char: 5,
            type_code: 1,
            class: TokenClass::Variable,
        };
        let rebased = range.rebased(5);
        assert_eq!(rebased.start(), (1, 2));
        assert_eq!(rebased.end(), (1, 5));
    }
}
