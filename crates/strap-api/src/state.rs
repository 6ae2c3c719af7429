//! Application state for the strap API

use std::sync::Arc;

use strap_core::{HistoryDecoder, HistoryIngest, StagingArea};

/// Default cap on request bodies (64 MiB)
pub const DEFAULT_UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Stage → decode → release pipeline
    ingest: HistoryIngest,
    /// Largest accepted request body in bytes
    upload_limit: usize,
}

impl AppState {
    /// Create a new AppState staging into `staging` and decoding with `decoder`
    pub fn new(staging: Arc<dyn StagingArea>, decoder: Arc<dyn HistoryDecoder>) -> Self {
        Self::from_ingest(HistoryIngest::new(staging, decoder))
    }

    /// Create a new AppState from an existing pipeline
    pub fn from_ingest(ingest: HistoryIngest) -> Self {
        Self {
            ingest,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    /// Override the request body cap
    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit = bytes;
        self
    }

    /// Get the ingest pipeline
    pub fn ingest(&self) -> &HistoryIngest {
        &self.ingest
    }

    /// Get the request body cap
    pub fn upload_limit(&self) -> usize {
        self.upload_limit
    }
}
