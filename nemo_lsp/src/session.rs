//! Highlight session: the observer the host wires to its notebook and
//! language server events.
//!
//! One highlight cycle is: a readiness signal issues a request, the host
//! returns the response, the response is decoded, partitioned and applied.
//! Only the most recently issued request is ever applied; responses to
//! older requests are stale and dropped.

use crate::apply::{apply_detailed, ApplyReport};
use crate::config::{ConfigError, HighlightConfig};
use crate::highlight::decode_response;
use crate::messages::{KernelMessage, LspNotification, LspRequest, LspResponse, RequestId};
use crate::partition::partition_with_gap;
use crossbeam_channel::{Receiver, Sender};
use nemo_core::{CellId, DecorationRegistry, EditorId, Notebook, NotebookChange, VirtualDocument};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Errors raised by the session glue.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("language server channel disconnected")]
    LspDisconnected,
    #[error("kernel channel disconnected")]
    KernelDisconnected,
}

/// Handle for sending requests to the language server.
#[derive(Clone)]
pub struct LspHandle {
    request_tx: Sender<LspRequest>,
    next_id: Arc<AtomicU64>,
}

impl LspHandle {
    /// Creates a handle and the receiver the host drains.
    pub fn channel() -> (Self, Receiver<LspRequest>) {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let handle = Self {
            request_tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (handle, request_rx)
    }

    /// Generates a new request ID.
    pub fn next_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Sends a request to the host.
    pub fn send(&self, request: LspRequest) -> Result<(), SessionError> {
        self.request_tx
            .send(request)
            .map_err(|_| SessionError::LspDisconnected)
    }
}

/// Handle for sending messages to the kernel. No acknowledgment is awaited.
#[derive(Clone)]
pub struct KernelHandle {
    message_tx: Sender<KernelMessage>,
}

impl KernelHandle {
    /// Creates a handle and the receiver the host drains.
    pub fn channel() -> (Self, Receiver<KernelMessage>) {
        let (message_tx, message_rx) = crossbeam_channel::unbounded();
        (Self { message_tx }, message_rx)
    }

    pub fn send(&self, message: KernelMessage) -> Result<(), SessionError> {
        self.message_tx
            .send(message)
            .map_err(|_| SessionError::KernelDisconnected)
    }
}

/// Events the host forwards from its notebook and language server.
pub trait NotebookObserver {
    /// The server has highlights for the virtual document. Issues a
    /// highlight request and returns its ID.
    fn on_highlights_ready(&mut self) -> Result<RequestId, SessionError>;

    /// Cells were removed from `notebook`, which already reflects the
    /// removal.
    fn on_cells_removed(&mut self, notebook: &Notebook, removed: &[CellId])
        -> Result<(), SessionError>;
}

/// Result of handing a response to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// The response does not belong to the latest request.
    Stale,
    /// The server had nothing to highlight; no editor was touched.
    NoHighlights,
    /// Decorations were applied.
    Applied(ApplyReport),
}

/// Highlighting state of one notebook.
pub struct HighlightSession {
    config: HighlightConfig,
    lsp: LspHandle,
    kernel: KernelHandle,
    /// Most recently issued highlight request.
    pending: Option<RequestId>,
    /// Version of the last document sync.
    version: i32,
    registry: DecorationRegistry,
}

impl HighlightSession {
    /// Creates a session. Fails if the configured URI is invalid.
    pub fn new(
        config: HighlightConfig,
        lsp: LspHandle,
        kernel: KernelHandle,
    ) -> Result<Self, SessionError> {
        config.uri()?;
        Ok(Self {
            config,
            lsp,
            kernel,
            pending: None,
            version: 0,
            registry: DecorationRegistry::default(),
        })
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Returns the ID of the request whose response will be applied.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn registry(&self) -> &DecorationRegistry {
        &self.registry
    }

    /// Sends the full virtual document text to the server.
    pub fn sync_document(&mut self, notebook: &Notebook) -> Result<(), SessionError> {
        let document = VirtualDocument::new(notebook, self.config.separator_lines);
        self.version += 1;
        self.lsp.send(LspRequest::DidChange {
            uri: self.config.uri()?,
            version: self.version,
            text: document.text().to_string(),
        })
    }

    /// Routes a server notification. Returns the ID of the highlight
    /// request it triggered, if any.
    pub fn handle_notification(
        &mut self,
        notification: LspNotification,
    ) -> Result<Option<RequestId>, SessionError> {
        match notification {
            LspNotification::Diagnostics { uri } if uri == self.config.document_uri => {
                self.on_highlights_ready().map(Some)
            }
            LspNotification::Diagnostics { uri } => {
                log::trace!("Ignoring diagnostics for {}", uri);
                Ok(None)
            }
            LspNotification::ServerExited => {
                log::info!("Language server exited");
                self.pending = None;
                Ok(None)
            }
        }
    }

    /// Handles the response to a highlight request.
    pub fn handle_response(
        &mut self,
        response: LspResponse,
        notebook: &mut Notebook,
    ) -> HighlightOutcome {
        if self.pending != Some(response.id()) {
            log::debug!(
                "Dropping stale highlight response {} (latest: {:?})",
                response.id(),
                self.pending
            );
            return HighlightOutcome::Stale;
        }
        self.pending = None;

        let result = match response {
            LspResponse::DocumentHighlight { result, .. } => result,
            LspResponse::Error { id, message } => {
                log::warn!("Highlight request {} failed: {}", id, message);
                return HighlightOutcome::NoHighlights;
            }
        };

        let ranges = decode_response(result);
        if ranges.is_empty() {
            log::debug!("No highlights available");
            return HighlightOutcome::NoHighlights;
        }

        let batches = partition_with_gap(&ranges, notebook.editors(), self.config.separator_lines);
        let report = apply_detailed(&batches, notebook.editors_mut(), &mut self.registry);
        if !report.is_success() {
            log::debug!("Editors without highlights: {:?}", report.empty_editors());
        }
        HighlightOutcome::Applied(report)
    }

    /// Routes a structural notebook change.
    pub fn observe_change(
        &mut self,
        change: &NotebookChange,
        notebook: &Notebook,
    ) -> Result<(), SessionError> {
        match change {
            NotebookChange::Removed { ids } if !ids.is_empty() => {
                self.on_cells_removed(notebook, ids)
            }
            _ => Ok(()),
        }
    }
}

impl NotebookObserver for HighlightSession {
    fn on_highlights_ready(&mut self) -> Result<RequestId, SessionError> {
        let id = self.lsp.next_id();
        self.lsp
            .send(LspRequest::document_highlight(id, self.config.uri()?))?;
        if let Some(previous) = self.pending.replace(id) {
            log::debug!("Highlight request {} superseded by {}", previous, id);
        }
        Ok(id)
    }

    fn on_cells_removed(
        &mut self,
        notebook: &Notebook,
        removed: &[CellId],
    ) -> Result<(), SessionError> {
        let live: Vec<EditorId> = notebook.editors().iter().map(|e| e.id()).collect();
        self.registry.retain_editors(&live);

        let code = notebook.cell_removal_code();
        log::info!("Cells removed: {:?}, notifying kernel", removed);
        self.kernel.send(KernelMessage::cell_removal(code))
    }
}
