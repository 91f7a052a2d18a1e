//! Prompt store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, storing or exporting prompts
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Unsupported prompt kind: '{0}'. Supported: cot, tot, active, persona")]
    UnsupportedKind(String),

    #[error("Unknown prompt kind in record: '{0}'")]
    UnknownKind(String),

    #[error("Field '{field}' does not exist on {kind} prompts")]
    UnknownField { kind: String, field: String },

    #[error("Prompt file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Malformed prompt file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PromptError {
    /// Check if the error means the backing file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, PromptError::NotFound { .. })
    }

    /// Check if the error means the backing file exists but could not be understood
    pub fn is_corrupt(&self) -> bool {
        matches!(self, PromptError::Malformed { .. } | PromptError::UnknownKind(_))
    }
}
