//! Progression error handling
//!
//! Every failure the progression subsystem can report. Nothing here is fatal:
//! the worst outcome of any error is progression state left unchanged.

use bincode::error::{DecodeError, EncodeError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by persistence and save-slot operations
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// Save-slot system error (carries anyhow context)
    #[error("Save system error: {0}")]
    Save(#[from] anyhow::Error),

    /// IO failure (unreadable or unwritable path)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document exists but cannot be parsed
    #[error("Malformed document {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Slot index outside the configured range
    #[error("Invalid save slot {0}")]
    InvalidSlot(usize),

    /// Document written by a newer format
    #[error("Unsupported document version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl ProgressionError {
    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ProgressionError::Malformed {
            path: path.into(),
            source,
        }
    }
}

impl From<DecodeError> for ProgressionError {
    fn from(err: DecodeError) -> Self {
        ProgressionError::Deserialization(err.to_string())
    }
}

impl From<EncodeError> for ProgressionError {
    fn from(err: EncodeError) -> Self {
        ProgressionError::Serialization(err.to_string())
    }
}

/// Turn an error into a message suitable for the player
pub fn handle_error(error: &ProgressionError) -> String {
    match error {
        ProgressionError::Malformed { .. } => "Saved progress is corrupted and was ignored".to_string(),
        ProgressionError::InvalidSlot(slot) => format!("Save slot {} does not exist", slot),
        ProgressionError::UnsupportedVersion { found, .. } => {
            format!("Saved progress comes from a newer version ({})", found)
        }
        ProgressionError::Io(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Save file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "No permission to access the save file".to_string(),
            _ => format!("IO error: {}", e),
        },
        _ => error.to_string(),
    }
}
