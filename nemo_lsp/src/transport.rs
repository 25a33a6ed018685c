//! JSON-RPC framing for the highlight channel.
//!
//! The host owns the connection to the language server. This module turns
//! session requests into framed JSON-RPC bytes and framed server output
//! back into responses and notifications.

use crate::messages::{LspNotification, LspRequest, LspResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Framing and message conversion errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("missing Content-Length header")]
    MissingContentLength,
    #[error("invalid Content-Length header: {0}")]
    InvalidContentLength(String),
    #[error("invalid UTF-8 in message")]
    InvalidUtf8,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON-RPC message types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Notification(JsonRpcNotification),
}

/// JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RpcId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC notification (no id, no response expected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Wire request ID (can be number or string).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    String(String),
}

impl From<u64> for RpcId {
    /// IDs beyond `i64::MAX` are sent as decimal strings.
    fn from(id: u64) -> Self {
        match i64::try_from(id) {
            Ok(n) => RpcId::Number(n),
            Err(_) => RpcId::String(id.to_string()),
        }
    }
}

/// Converts a session request into its JSON-RPC form.
pub fn to_json_rpc(request: &LspRequest) -> Result<JsonRpcMessage, TransportError> {
    let message = match request {
        LspRequest::DocumentHighlight { id, params } => JsonRpcMessage::Request(JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: (*id).into(),
            method: "textDocument/documentHighlight".to_string(),
            params: Some(serde_json::to_value(params)?),
        }),
        LspRequest::DidChange { uri, version, text } => {
            let params = lsp_types::DidChangeTextDocumentParams {
                text_document: lsp_types::VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: *version,
                },
                content_changes: vec![lsp_types::TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: text.clone(),
                }],
            };
            JsonRpcMessage::Notification(JsonRpcNotification {
                jsonrpc: "2.0".to_string(),
                method: "textDocument/didChange".to_string(),
                params: Some(serde_json::to_value(params)?),
            })
        }
    };
    Ok(message)
}

/// Converts a server response into a session response. Responses with an
/// ID the session could not have issued are ignored.
pub fn response_from_json_rpc(response: JsonRpcResponse) -> Option<LspResponse> {
    let issued = match &response.id {
        RpcId::Number(n) => u64::try_from(*n).ok(),
        RpcId::String(s) => s.parse::<u64>().ok().filter(|&n| n > i64::MAX as u64),
    };
    let id = match issued {
        Some(id) => id,
        None => {
            log::warn!("Received response for unknown request: {:?}", response.id);
            return None;
        }
    };

    Some(match response.error {
        Some(error) => LspResponse::Error {
            id,
            message: error.message,
        },
        None => LspResponse::DocumentHighlight {
            id,
            result: response.result,
        },
    })
}

/// Converts a server notification into a session notification.
pub fn notification_from_json_rpc(notification: JsonRpcNotification) -> Option<LspNotification> {
    match notification.method.as_str() {
        "textDocument/publishDiagnostics" => {
            let params = notification.params?;
            match serde_json::from_value::<lsp_types::PublishDiagnosticsParams>(params) {
                Ok(params) => Some(LspNotification::Diagnostics {
                    uri: params.uri.as_str().to_string(),
                }),
                Err(e) => {
                    log::warn!("Malformed diagnostics notification: {}", e);
                    None
                }
            }
        }
        "exit" => Some(LspNotification::ServerExited),
        _ => {
            log::trace!("Unhandled notification: {}", notification.method);
            None
        }
    }
}

/// Encodes a message with its `Content-Length` header.
pub fn encode_frame(message: &JsonRpcMessage) -> Result<Vec<u8>, TransportError> {
    let content = serde_json::to_string(message)?;
    let mut frame = format!("Content-Length: {}\r\n\r\n", content.len()).into_bytes();
    frame.extend_from_slice(content.as_bytes());
    log::trace!("Encoded: {}", content);
    Ok(frame)
}

/// Decodes the first complete frame in `buf`.
///
/// Returns the message and the number of bytes consumed, or `None` if the
/// buffer does not hold a complete frame yet.
pub fn decode_frame(buf: &[u8]) -> Result<Option<(JsonRpcMessage, usize)>, TransportError> {
    let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        return Ok(None);
    };
    let header = std::str::from_utf8(&buf[..header_end]).map_err(|_| TransportError::InvalidUtf8)?;

    let mut content_length: Option<usize> = None;
    for line in header.split("\r\n") {
        if let Some(len_str) = line.strip_prefix("Content-Length:") {
            let len_str = len_str.trim();
            content_length = Some(
                len_str
                    .parse()
                    .map_err(|_| TransportError::InvalidContentLength(len_str.to_string()))?,
            );
        }
    }
    let content_length = content_length.ok_or(TransportError::MissingContentLength)?;

    let body_start = header_end + 4;
    let body_end = body_start
        .checked_add(content_length)
        .ok_or_else(|| TransportError::InvalidContentLength(content_length.to_string()))?;
    if buf.len() < body_end {
        return Ok(None);
    }

    let content =
        std::str::from_utf8(&buf[body_start..body_end]).map_err(|_| TransportError::InvalidUtf8)?;
    log::trace!("Received: {}", content);
    let value: Value = serde_json::from_str(content)?;
    let message = parse_message(value)?;
    Ok(Some((message, body_end)))
}

/// Determines the message type from the fields present.
fn parse_message(value: Value) -> Result<JsonRpcMessage, TransportError> {
    let has_id = value.get("id").is_some();
    let has_method = value.get("method").is_some();

    let message = match (has_id, has_method) {
        (true, false) => JsonRpcMessage::Response(serde_json::from_value(value)?),
        (true, true) => JsonRpcMessage::Request(serde_json::from_value(value)?),
        _ => JsonRpcMessage::Notification(serde_json::from_value(value)?),
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(value: Value) -> Vec<u8> {
        let content = value.to_string();
        let mut bytes = format!("Content-Length: {}\r\n\r\n", content.len()).into_bytes();
        bytes.extend_from_slice(content.as_bytes());
        bytes
    }

    #[test]
    fn test_highlight_request_to_json_rpc() {
        let uri = "file:///notebook.nmo".parse().unwrap();
        let message = to_json_rpc(&LspRequest::document_highlight(9, uri)).unwrap();
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["id"], json!(9));
        assert_eq!(value["method"], json!("textDocument/documentHighlight"));
        assert_eq!(value["params"]["position"], json!({ "line": 0, "character": 0 }));
        assert_eq!(value["params"]["textDocument"]["uri"], json!("file:///notebook.nmo"));
    }

    #[test]
    fn test_did_change_is_a_notification() {
        let request = LspRequest::DidChange {
            uri: "file:///notebook.nmo".parse().unwrap(),
            version: 3,
            text: "p(1).".to_string(),
        };
        let message = to_json_rpc(&request).unwrap();
        assert!(matches!(message, JsonRpcMessage::Notification(_)));
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["params"]["contentChanges"][0]["text"], json!("p(1)."));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_decode_response_frame() {
        let mut buf = frame(json!({ "jsonrpc": "2.0", "id": 1, "result": [] }));
        let trailing = frame(json!({ "jsonrpc": "2.0", "method": "exit" }));
        buf.extend_from_slice(&trailing);

        let (message, used) = decode_frame(&buf).unwrap().unwrap();
        let JsonRpcMessage::Response(response) = message else {
            panic!("expected a response");
        };
        assert!(matches!(
            response_from_json_rpc(response),
            Some(LspResponse::DocumentHighlight { id: 1, result: Some(_) })
        ));

        let (message, _) = decode_frame(&buf[used..]).unwrap().unwrap();
        let JsonRpcMessage::Notification(notification) = message else {
            panic!("expected a notification");
        };
        assert_eq!(
            notification_from_json_rpc(notification),
            Some(LspNotification::ServerExited)
        );
    }

    #[test]
    fn test_partial_frame() {
        let buf = frame(json!({ "jsonrpc": "2.0", "id": 1, "result": null }));
        assert!(decode_frame(&buf[..buf.len() - 1]).unwrap().is_none());
        assert!(decode_frame(b"Content-Length: 2").unwrap().is_none());
    }

    #[test]
    fn test_missing_content_length() {
        let result = decode_frame(b"Content-Type: x\r\n\r\n{}");
        assert!(matches!(result, Err(TransportError::MissingContentLength)));
    }

    #[test]
    fn test_oversized_content_length() {
        let result = decode_frame(b"Content-Length: 18446744073709551615\r\n\r\n{}");
        assert!(matches!(result, Err(TransportError::InvalidContentLength(_))));
    }

    #[test]
    fn test_large_request_id_round_trips() {
        let id = u64::MAX;
        let rpc_id = RpcId::from(id);
        assert_eq!(rpc_id, RpcId::String(id.to_string()));
        assert_eq!(RpcId::from(7u64), RpcId::Number(7));

        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: rpc_id,
            result: None,
            error: None,
        };
        assert_eq!(response_from_json_rpc(response).map(|r| r.id()), Some(id));
    }

    #[test]
    fn test_error_response() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: RpcId::Number(5),
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: "method not found".to_string(),
                data: None,
            }),
        };
        assert!(matches!(
            response_from_json_rpc(response),
            Some(LspResponse::Error { id: 5, .. })
        ));
    }

    #[test]
    fn test_string_id_response_is_ignored() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: RpcId::String("host-1".to_string()),
            result: None,
            error: None,
        };
        assert!(response_from_json_rpc(response).is_none());
    }

    #[test]
    fn test_diagnostics_notification() {
        let notification = JsonRpcNotification {
            jsonrpc: "2.0".to_string(),
            method: "textDocument/publishDiagnostics".to_string(),
            params: Some(json!({ "uri": "file:///notebook.nmo", "diagnostics": [] })),
        };
        assert_eq!(
            notification_from_json_rpc(notification),
            Some(LspNotification::Diagnostics {
                uri: "file:///notebook.nmo".to_string()
            })
        );
    }
}
