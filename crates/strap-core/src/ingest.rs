//! Stage → decode → release pipeline

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::decoder::HistoryDecoder;
use crate::error::IngestResult;
use crate::record::HistoryRecord;
use crate::staging::{StagedArtifact, StagingArea};

/// Turns uploaded bytes into history records
///
/// Each call stages its own artifact; nothing is shared between calls except
/// the staging area itself.
#[derive(Clone)]
pub struct HistoryIngest {
    staging: Arc<dyn StagingArea>,
    decoder: Arc<dyn HistoryDecoder>,
}

impl HistoryIngest {
    pub fn new(staging: Arc<dyn StagingArea>, decoder: Arc<dyn HistoryDecoder>) -> Self {
        Self { staging, decoder }
    }

    /// Stage `upload`, decode it and remove the staged artifact.
    ///
    /// The artifact is removed whether decoding succeeds or not. If decoding
    /// fails, its error is returned even when removal fails too (the removal
    /// failure is logged). If decoding succeeds but removal fails, the
    /// removal error is returned.
    ///
    /// Blocks for the duration of the decode.
    pub fn ingest(&self, upload: &[u8]) -> IngestResult<Vec<HistoryRecord>> {
        let started = Instant::now();
        let artifact = StagedArtifact::stage(self.staging.clone(), upload)?;

        let decoded = self.decoder.parse(artifact.path());
        let released = artifact.release();

        match (decoded, released) {
            (Ok(records), Ok(())) => {
                info!(
                    decoder = self.decoder.name(),
                    size = upload.len(),
                    records = records.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "History decoded"
                );
                Ok(records)
            }
            (Ok(records), Err(cleanup)) => {
                warn!(
                    records = records.len(),
                    "Discarding decoded records because the staged upload could not be removed"
                );
                Err(cleanup)
            }
            (Err(decode), Ok(())) => {
                warn!(
                    decoder = self.decoder.name(),
                    size = upload.len(),
                    error = %decode,
                    "History decode failed"
                );
                Err(decode.into())
            }
            (Err(decode), Err(cleanup)) => {
                error!(
                    decoder = self.decoder.name(),
                    error = %decode,
                    cleanup_error = %cleanup,
                    "History decode failed and the staged upload could not be removed"
                );
                Err(decode.into())
            }
        }
    }
}

impl std::fmt::Debug for HistoryIngest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryIngest")
            .field("decoder", &self.decoder.name())
            .finish_non_exhaustive()
    }
}
