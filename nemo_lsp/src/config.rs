//! Highlight channel configuration.

use nemo_core::DEFAULT_CELL_GAP;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or interpreting the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse highlight configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid document URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },
}

/// Settings of the highlight channel for one notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// URI of the virtual document the language server sees.
    pub document_uri: String,
    /// Empty lines separating two cells in the virtual document.
    pub separator_lines: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            document_uri: "file:///notebook.nmo".to_string(),
            separator_lines: DEFAULT_CELL_GAP,
        }
    }
}

impl HighlightConfig {
    /// Creates a configuration for the given document URI.
    pub fn new(document_uri: impl Into<String>) -> Self {
        Self {
            document_uri: document_uri.into(),
            ..Default::default()
        }
    }

    /// Loads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses the document URI.
    pub fn uri(&self) -> Result<lsp_types::Uri, ConfigError> {
        self.document_uri
            .parse::<lsp_types::Uri>()
            .map_err(|e| ConfigError::InvalidUri {
                uri: self.document_uri.clone(),
                reason: e.to_string(),
            })
    }
}
