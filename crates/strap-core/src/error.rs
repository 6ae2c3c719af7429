//! Error types for decoding and ingestion

use std::path::PathBuf;

use thiserror::Error;

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for the ingest pipeline
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors a [`crate::HistoryDecoder`] can return
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The staged file could not be read
    #[error("failed to read history file: {0}")]
    Io(#[from] std::io::Error),

    /// The file contains no bytes at all
    #[error("history file is empty")]
    Empty,

    /// Framing is broken at a given byte offset
    #[error("malformed frame at offset {offset}: {reason}")]
    Frame { offset: usize, reason: String },

    /// A frame was intact but its record payload could not be decoded
    #[error("malformed history record at offset {offset}: {reason}")]
    Record { offset: usize, reason: String },
}

/// Errors from the stage → decode → release pipeline
///
/// Every variant is reported to HTTP callers the same way; the variant is kept
/// so logs can tell the failure kinds apart.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload could not be read from the request
    #[error("upload failed: {0}")]
    Upload(String),

    /// The upload could not be written to the staging area
    #[error("failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),

    /// The decoder rejected the staged content
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// The staged artifact could not be removed
    #[error("failed to remove staged file {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decode task did not finish normally
    #[error("internal error: {0}")]
    Internal(String),
}

impl IngestError {
    /// Short, stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Upload(_) => "upload",
            IngestError::Staging(_) => "staging",
            IngestError::Decode(_) => "decode",
            IngestError::Cleanup { .. } => "cleanup",
            IngestError::Internal(_) => "internal",
        }
    }
}
