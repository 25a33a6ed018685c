//! Nemo Core - Notebook cell editors and decorations.
//!
//! This crate holds the editor-side state of a Nemo notebook without any
//! dependency on the language server or the kernel: cell texts, their
//! decoration stores, the token theme and the virtual document layout.

pub mod buffer;
pub mod decoration;
pub mod editor;
pub mod notebook;
pub mod theme;
pub mod virtual_document;

pub use buffer::CellText;
pub use decoration::{Decoration, DecorationRegistry, DecorationStore};
pub use editor::{CellEditor, EditorId};
pub use notebook::{cell_removal_code, CellId, Notebook, NotebookChange, CELL_REMOVAL_EVENT};
pub use theme::{Theme, TokenClass, TokenStyle};
pub use virtual_document::{Block, VirtualDocument, DEFAULT_CELL_GAP};
