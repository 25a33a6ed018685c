//! Nemo Kernel - Kernel-side state of a Nemo notebook.
//!
//! The kernel keeps the rules of every executed cell so each execution can
//! reason over the whole notebook, and prunes them when the front-end
//! announces which cells survive a removal.

pub mod removal;
pub mod state;
pub mod statements;

pub use removal::{is_cell_removal, parse_cell_removal};
pub use state::{CellStore, Execution, KernelInput};
pub use statements::{engine_rules, filter_statements, strip_comments, Directives};

/// Errors raised while interpreting execute requests.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("malformed cell removal payload: {0}")]
    MalformedRemoval(String),
    #[error("invalid cell list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("directive matching failed: {0}")]
    Pattern(#[from] fancy_regex::Error),
}
