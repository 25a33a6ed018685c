//! Distribution of decoded highlights over the cell editors.

use crate::types::HighlightRange;
use nemo_core::{CellEditor, DEFAULT_CELL_GAP};

/// Anything that occupies a block of lines in the virtual document.
pub trait EditorSpan {
    fn line_count(&self) -> usize;
}

impl EditorSpan for CellEditor {
    fn line_count(&self) -> usize {
        CellEditor::line_count(self)
    }
}

impl EditorSpan for usize {
    fn line_count(&self) -> usize {
        *self
    }
}

/// The highlights of one editor, rebased to the editor's own lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBatch {
    /// First virtual line of the editor's block.
    pub offset: usize,
    pub ranges: Vec<HighlightRange>,
}

impl TokenBatch {
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }
}

/// Computes the first virtual line of every editor's block.
pub fn block_offsets<E: EditorSpan>(editors: &[E], gap: usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(editors.len());
    let mut offset = 0;
    for editor in editors {
        offsets.push(offset);
        offset += editor.line_count() + gap;
    }
    offsets
}

/// Partitions ranges across editors separated by the default gap.
pub fn partition<E: EditorSpan>(ranges: &[HighlightRange], editors: &[E]) -> Vec<TokenBatch> {
    partition_with_gap(ranges, editors, DEFAULT_CELL_GAP)
}

/// Partitions ranges across editors whose blocks are `gap` lines apart.
///
/// A range belongs to the editor whose block contains its start line. It is
/// never split; ranges starting in a gap or after the last block are
/// dropped. Order within each batch follows the input order.
pub fn partition_with_gap<E: EditorSpan>(
    ranges: &[HighlightRange],
    editors: &[E],
    gap: usize,
) -> Vec<TokenBatch> {
    let mut batches: Vec<TokenBatch> = block_offsets(editors, gap)
        .into_iter()
        .map(|offset| TokenBatch {
            offset,
            ranges: Vec::new(),
        })
        .collect();

    let mut dropped = 0;
    for range in ranges {
        let owner = batches.iter().zip(editors).position(|(batch, editor)| {
            range.start_line >= batch.offset
                && range.start_line < batch.offset + editor.line_count()
        });
        match owner {
            Some(index) => {
                let offset = batches[index].offset;
                batches[index].ranges.push(range.rebased(offset));
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("Dropped {} highlights outside of any cell", dropped);
    }
    batches
}
