//! Turning token batches into editor decorations.

use crate::partition::TokenBatch;
use crate::types::HighlightRange;
use nemo_core::{CellEditor, Decoration, DecorationRegistry, EditorId};

/// What happened to one editor during an apply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// The decoration set was replaced. `skipped` counts ranges that no
    /// longer resolve against the editor's text.
    Applied { decorations: usize, skipped: usize },
    /// The editor received no highlights and was left untouched.
    Empty,
    /// The editor refused the decoration set.
    Rejected,
}

/// Per-editor result of one apply cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    outcomes: Vec<(EditorId, EditorOutcome)>,
}

impl ApplyReport {
    /// True only if every editor received highlights.
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, EditorOutcome::Applied { .. }))
    }

    pub fn outcomes(&self) -> &[(EditorId, EditorOutcome)] {
        &self.outcomes
    }

    pub fn outcome(&self, editor: EditorId) -> Option<EditorOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == editor)
            .map(|(_, outcome)| *outcome)
    }

    /// Editors that were left without highlights.
    pub fn empty_editors(&self) -> Vec<EditorId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == EditorOutcome::Empty)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Resolves one rebased range against an editor's current line table.
/// Ranges that clamp to nothing do not resolve.
fn resolve(editor: &CellEditor, range: &HighlightRange) -> Option<Decoration> {
    let from = editor.resolve(range.start_line, range.start_char)?;
    let to = editor.resolve(range.end_line, range.end_char)?;
    let decoration = Decoration::new(from, to.max(from), range.class);
    (!decoration.is_empty()).then_some(decoration)
}

/// Applies batches to editors, pairing them by position, and reports the
/// outcome of every editor.
///
/// Editors with a non-empty batch get their decoration layer installed on
/// first use and their whole decoration set replaced in one update.
/// Editors without highlights keep whatever they showed before.
pub fn apply_detailed(
    batches: &[TokenBatch],
    editors: &mut [CellEditor],
    registry: &mut DecorationRegistry,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (i, editor) in editors.iter_mut().enumerate() {
        let batch = match batches.get(i) {
            Some(batch) if !batch.is_empty() => batch,
            _ => {
                report.outcomes.push((editor.id(), EditorOutcome::Empty));
                continue;
            }
        };

        let mut skipped = 0;
        let decorations: Vec<Decoration> = batch
            .ranges
            .iter()
            .filter_map(|range| {
                let decoration = resolve(editor, range);
                if decoration.is_none() {
                    skipped += 1;
                }
                decoration
            })
            .collect();
        if skipped > 0 {
            log::warn!(
                "Skipped {} highlights not matching the text of editor {}",
                skipped,
                editor.id()
            );
        }

        registry.ensure_installed(editor);
        let count = decorations.len();
        let outcome = if editor.set_decorations(decorations) {
            EditorOutcome::Applied {
                decorations: count,
                skipped,
            }
        } else {
            EditorOutcome::Rejected
        };
        report.outcomes.push((editor.id(), outcome));
    }

    report
}

/// Applies batches to editors. Returns false if any editor received no
/// highlights, even though the others were still decorated.
pub fn apply(
    batches: &[TokenBatch],
    editors: &mut [CellEditor],
    registry: &mut DecorationRegistry,
) -> bool {
    apply_detailed(batches, editors, registry).is_success()
}
