//! Decoding of delta-encoded highlight responses.
//!
//! Positions arrive relative to the previous entry. The decoder keeps a
//! cursor over one response and rebuilds absolute positions strictly in
//! input order; reordering the entries yields different positions.

use crate::types::{HighlightRange, RawHighlight};
use lsp_types::DocumentHighlight;
use nemo_core::TokenClass;
use serde_json::Value;

/// Running position of a decode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DecodeCursor {
    last_line: usize,
    last_char: usize,
}

impl DecodeCursor {
    fn advance(&mut self, raw: RawHighlight) -> HighlightRange {
        let line = self.last_line.saturating_add(raw.line_delta as usize);
        // A new line resets the column baseline.
        let start_char = if raw.line_delta == 0 {
            self.last_char.saturating_add(raw.char_delta as usize)
        } else {
            raw.char_delta as usize
        };
        self.last_line = line;
        self.last_char = start_char;

        HighlightRange {
            start_line: line,
            start_char,
            end_line: line,
            end_char: start_char.saturating_add(raw.length as usize),
            type_code: raw.type_code,
            class: TokenClass::from_code(raw.type_code),
        }
    }
}

/// Decodes highlight entries into absolute ranges, one per entry, in order.
pub fn decode(highlights: &[DocumentHighlight]) -> Vec<HighlightRange> {
    let mut cursor = DecodeCursor::default();
    let ranges: Vec<HighlightRange> = highlights
        .iter()
        .map(|highlight| cursor.advance(RawHighlight::from(highlight)))
        .collect();
    log::trace!("Decoded {} highlight entries", ranges.len());
    ranges
}

/// Parses the result of a `textDocument/documentHighlight` request.
///
/// A missing, `null` or malformed result means there is nothing to
/// highlight.
pub fn parse_highlight_response(result: Option<Value>) -> Vec<DocumentHighlight> {
    let Some(value) = result else {
        return vec![];
    };

    match serde_json::from_value::<Option<Vec<DocumentHighlight>>>(value) {
        Ok(highlights) => highlights.unwrap_or_default(),
        Err(e) => {
            log::warn!("Malformed document highlight response: {}", e);
            vec![]
        }
    }
}

/// Parses and decodes a highlight response in one step.
pub fn decode_response(result: Option<Value>) -> Vec<HighlightRange> {
    decode(&parse_highlight_response(result))
}
