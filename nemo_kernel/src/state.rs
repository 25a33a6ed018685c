//! Rules kept per cell across executions.
//!
//! Every executed cell stores its rules, minus directives, so later cells
//! can reason over the whole notebook. The store is pruned when the
//! front-end reports removed cells.

use crate::removal::{is_cell_removal, parse_cell_removal};
use crate::statements::{engine_rules, filter_statements, Directives};
use crate::KernelError;
use indexmap::IndexMap;
use nemo_core::CellId;

/// A program ready for the reasoning engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub cell_id: CellId,
    /// The cell's code followed by the stored rules of every other cell.
    pub program: String,
    pub directives: Directives,
}

impl Execution {
    /// The program as the engine consumes it.
    pub fn engine_program(&self) -> String {
        engine_rules(&self.program)
    }
}

/// Outcome of one execute request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelInput {
    /// The request was a removal notice; `retained` cells remain stored.
    CellsRemoved { retained: usize },
    /// The request holds rules to reason over.
    Execute(Execution),
}

/// Stored rules by cell, in first-execution order.
#[derive(Debug, Clone, Default)]
pub struct CellStore {
    cells: IndexMap<CellId, String>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches an execute request from the front-end.
    pub fn handle(&mut self, cell_id: CellId, code: &str) -> Result<KernelInput, KernelError> {
        if is_cell_removal(code) {
            let retained = self.handle_cell_removal(code)?;
            return Ok(KernelInput::CellsRemoved { retained });
        }
        self.record(cell_id, code).map(KernelInput::Execute)
    }

    /// Stores a cell's rules and builds the program to run for it.
    pub fn record(&mut self, cell_id: CellId, code: &str) -> Result<Execution, KernelError> {
        let directives = Directives::extract(code)?;
        let saved = if directives.any() {
            filter_statements(code, true)
        } else {
            code.to_string()
        };
        self.cells.insert(cell_id.clone(), saved);

        let mut program = code.to_string();
        if !program.is_empty() && !program.ends_with('\n') {
            // A trailing comment must not swallow the next cell's rules.
            program.push('\n');
        }
        for (id, rules) in &self.cells {
            if *id != cell_id {
                program.push_str(rules);
                program.push('\n');
            }
        }

        Ok(Execution {
            cell_id,
            program,
            directives,
        })
    }

    /// Drops a cell whose execution failed.
    pub fn discard(&mut self, cell_id: &CellId) -> Option<String> {
        self.cells.shift_remove(cell_id)
    }

    /// Keeps only the listed cells.
    pub fn retain_cells(&mut self, current: &[CellId]) {
        self.cells.retain(|id, _| current.contains(id));
    }

    /// Applies a cell-removal payload. Returns the number of cells kept.
    pub fn handle_cell_removal(&mut self, code: &str) -> Result<usize, KernelError> {
        let current = parse_cell_removal(code)?;
        let before = self.cells.len();
        self.retain_cells(&current);
        log::info!(
            "Cell removal: kept {} of {} stored cells",
            self.cells.len(),
            before
        );
        Ok(self.cells.len())
    }

    /// Returns the stored rules of a cell.
    pub fn rules(&self, cell_id: &CellId) -> Option<&str> {
        self.cells.get(cell_id).map(String::as_str)
    }

    /// Returns the stored cell IDs in order.
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CellId {
        CellId::from(s)
    }

    #[test]
    fn test_program_includes_other_cells() {
        let mut store = CellStore::new();
        store.record(id("a"), "p(1).").unwrap();
        let execution = store.record(id("b"), "q(X) :- p(X).\n@output q.").unwrap();

        assert_eq!(execution.program, "q(X) :- p(X).\n@output q.\np(1).\n");
        assert_eq!(execution.directives.outputs, vec!["q"]);
        // Directives are not stored.
        assert_eq!(store.rules(&id("b")), Some("q(X) :- p(X)."));
    }

    #[test]
    fn test_reexecuting_a_cell_replaces_its_rules() {
        let mut store = CellStore::new();
        store.record(id("a"), "p(1).").unwrap();
        store.record(id("b"), "q(2).").unwrap();
        let execution = store.record(id("a"), "p(3).").unwrap();

        assert_eq!(execution.program, "p(3).\nq(2).\n");
        assert_eq!(store.cell_ids(), vec![id("a"), id("b")]);
    }

    #[test]
    fn test_cell_removal_prunes_store() {
        let mut store = CellStore::new();
        for cell in ["a", "b", "c"] {
            store.record(id(cell), "p(1).").unwrap();
        }
        let input = store
            .handle(id("x"), r#"cell_removal_event, ["a","c"]"#)
            .unwrap();
        assert_eq!(input, KernelInput::CellsRemoved { retained: 2 });
        assert_eq!(store.cell_ids(), vec![id("a"), id("c")]);
    }

    #[test]
    fn test_handle_executes_rules() {
        let mut store = CellStore::new();
        let input = store.handle(id("a"), "p(1). @plot p.").unwrap();
        let KernelInput::Execute(execution) = input else {
            panic!("expected an execution");
        };
        assert_eq!(execution.engine_program(), "p(1). @output p.\n");
        assert_eq!(store.rules(&id("a")), Some("p(1)."));
    }

    #[test]
    fn test_discard_failed_cell() {
        let mut store = CellStore::new();
        store.record(id("a"), "p(1).").unwrap();
        store.record(id("b"), "broken(").unwrap();
        assert_eq!(store.discard(&id("b")), Some("broken(".to_string()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.discard(&id("b")), None);
    }

    #[test]
    fn test_malformed_removal_keeps_store() {
        let mut store = CellStore::new();
        store.record(id("a"), "p(1).").unwrap();
        assert!(store.handle(id("x"), "cell_removal_event").is_err());
        assert_eq!(store.len(), 1);
    }
}
