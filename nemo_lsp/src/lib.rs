//! Nemo LSP - Document highlight to semantic token adapter.
//!
//! The Nemo language server delivers semantic tokens through a repurposed
//! `textDocument/documentHighlight` response. This crate decodes those
//! responses, distributes the tokens over the cell editors of a notebook
//! and applies them as decorations. The host owns the server connection
//! and the kernel channel; it talks to this crate through the
//! [`NotebookObserver`] interface and channel-backed handles.

pub mod apply;
pub mod capabilities;
pub mod config;
pub mod highlight;
pub mod messages;
pub mod partition;
pub mod session;
pub mod transport;
pub mod types;

pub use apply::{apply, apply_detailed, ApplyReport, EditorOutcome};
pub use capabilities::{client_capabilities, negotiate_capabilities, supports_highlights};
pub use config::{ConfigError, HighlightConfig};
pub use highlight::{decode, decode_response, parse_highlight_response};
pub use messages::{KernelMessage, LspNotification, LspRequest, LspResponse, RequestId};
pub use partition::{block_offsets, partition, partition_with_gap, EditorSpan, TokenBatch};
pub use session::{
    HighlightOutcome, HighlightSession, KernelHandle, LspHandle, NotebookObserver, SessionError,
};
pub use types::{HighlightRange, RawHighlight};
