//! Message types exchanged with the host.
//!
//! Requests go out over channels; the host forwards them to the language
//! server or the kernel and hands responses back to the session.

use lsp_types::{
    DocumentHighlightParams, PartialResultParams, Position, TextDocumentIdentifier,
    TextDocumentPositionParams, Uri, WorkDoneProgressParams,
};
use serde_json::Value;

/// Request ID for correlating responses.
pub type RequestId = u64;

/// Requests sent to the language server.
#[derive(Debug, Clone)]
pub enum LspRequest {
    /// The virtual document changed.
    DidChange {
        uri: Uri,
        version: i32,
        text: String,
    },
    /// Request the highlight tokens of the virtual document.
    DocumentHighlight {
        id: RequestId,
        params: DocumentHighlightParams,
    },
}

impl LspRequest {
    /// Builds a highlight request for `uri`. The position carries no
    /// meaning for the Nemo server and is always (0, 0).
    pub fn document_highlight(id: RequestId, uri: Uri) -> Self {
        Self::DocumentHighlight {
            id,
            params: DocumentHighlightParams {
                text_document_position_params: TextDocumentPositionParams {
                    text_document: TextDocumentIdentifier { uri },
                    position: Position::new(0, 0),
                },
                work_done_progress_params: WorkDoneProgressParams::default(),
                partial_result_params: PartialResultParams::default(),
            },
        }
    }

    /// Returns the request ID, if this request expects a response.
    pub fn id(&self) -> Option<RequestId> {
        match self {
            Self::DocumentHighlight { id, .. } => Some(*id),
            Self::DidChange { .. } => None,
        }
    }
}

/// Responses handed back by the host.
#[derive(Debug, Clone)]
pub enum LspResponse {
    /// Raw result of a highlight request.
    DocumentHighlight {
        id: RequestId,
        result: Option<Value>,
    },
    /// The server answered with an error.
    Error { id: RequestId, message: String },
}

impl LspResponse {
    pub fn id(&self) -> RequestId {
        match self {
            Self::DocumentHighlight { id, .. } | Self::Error { id, .. } => *id,
        }
    }
}

/// Notifications from the language server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LspNotification {
    /// The server published diagnostics for a document, which it does
    /// after every analysis pass. Highlights are ready at that point.
    Diagnostics { uri: String },
    /// Server has exited.
    ServerExited,
}

/// Message type used for the cell-removal side channel.
pub const KERNEL_MSG_TYPE: &str = "execute_request";
/// Message identifier used for the cell-removal side channel.
pub const KERNEL_MSG_ID: &str = "cell_removal_event";

/// A message for the notebook kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelMessage {
    pub msg_type: &'static str,
    pub msg_id: &'static str,
    /// Code payload the kernel receives.
    pub code: String,
    /// Silent messages produce no output and stay out of the history.
    pub silent: bool,
}

impl KernelMessage {
    /// Wraps a cell-removal payload.
    pub fn cell_removal(code: String) -> Self {
        Self {
            msg_type: KERNEL_MSG_TYPE,
            msg_id: KERNEL_MSG_ID,
            code,
            silent: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_highlight_request() {
        let uri: Uri = "file:///notebook.nmo".parse().unwrap();
        let request = LspRequest::document_highlight(4, uri);
        assert_eq!(request.id(), Some(4));
        let LspRequest::DocumentHighlight { params, .. } = request else {
            panic!("expected a highlight request");
        };
        let position = params.text_document_position_params.position;
        assert_eq!((position.line, position.character), (0, 0));
        assert_eq!(
            params.text_document_position_params.text_document.uri.as_str(),
            "file:///notebook.nmo"
        );
    }

    #[test]
    fn test_cell_removal_message() {
        let msg = KernelMessage::cell_removal(r#"cell_removal_event, ["a"]"#.to_string());
        assert_eq!(msg.msg_type, "execute_request");
        assert_eq!(msg.msg_id, "cell_removal_event");
        assert!(msg.silent);
    }
}
