//! HistoryDecoder trait - the contract between the pipeline and a wire format

use std::path::Path;

use crate::error::DecodeResult;
use crate::record::HistoryRecord;

/// Decodes a staged history file into records.
///
/// Implementations read the file at `path` and return records in stream
/// order. They are called from a blocking worker thread, so plain
/// `std::fs` reads are fine. Malformed input must come back as an `Err`.
pub trait HistoryDecoder: Send + Sync {
    /// Decode the file at `path`
    fn parse(&self, path: &Path) -> DecodeResult<Vec<HistoryRecord>>;

    /// Name used in logs
    fn name(&self) -> &str {
        "decoder"
    }
}

impl<F> HistoryDecoder for F
where
    F: Fn(&Path) -> DecodeResult<Vec<HistoryRecord>> + Send + Sync,
{
    fn parse(&self, path: &Path) -> DecodeResult<Vec<HistoryRecord>> {
        self(path)
    }

    fn name(&self) -> &str {
        "fn"
    }
}
