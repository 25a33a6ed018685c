//! Capability negotiation for the highlight channel.
//!
//! The Nemo server does not advertise document highlights even though it
//! answers them. The negotiated set is returned as a new value; the host's
//! capabilities are never modified.

use lsp_types::{
    ClientCapabilities, DynamicRegistrationClientCapabilities, OneOf, ServerCapabilities,
    TextDocumentClientCapabilities,
};

/// Returns a copy of the server capabilities with document highlights
/// enabled.
pub fn negotiate_capabilities(server: &ServerCapabilities) -> ServerCapabilities {
    let mut negotiated = server.clone();
    negotiated.document_highlight_provider = Some(OneOf::Left(true));
    negotiated
}

/// Returns true if the capabilities allow highlight requests.
pub fn supports_highlights(capabilities: &ServerCapabilities) -> bool {
    match &capabilities.document_highlight_provider {
        Some(OneOf::Left(enabled)) => *enabled,
        Some(OneOf::Right(_)) => true,
        None => false,
    }
}

/// Client capabilities announced when the highlight channel initializes.
pub fn client_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        text_document: Some(TextDocumentClientCapabilities {
            document_highlight: Some(DynamicRegistrationClientCapabilities {
                dynamic_registration: Some(false),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
