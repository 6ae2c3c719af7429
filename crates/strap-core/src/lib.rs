//! strap-core - Core types and the staging pipeline for strap history ingestion
//!
//! This crate owns the pieces that do not depend on HTTP or on a particular
//! wire format:
//!
//! - [`HistoryRecord`] and its JSON shape [`RecordPayload`]
//! - the [`HistoryDecoder`] contract that format crates implement
//! - the [`StagingArea`] abstraction (real directory or in-memory)
//! - [`HistoryIngest`], which stages an upload, decodes it and always
//!   removes the staged artifact afterwards

pub mod decoder;
pub mod error;
pub mod ingest;
pub mod record;
pub mod staging;

pub use decoder::HistoryDecoder;
pub use error::{DecodeError, DecodeResult, IngestError, IngestResult};
pub use ingest::HistoryIngest;
pub use record::{HistoryRecord, RecordPayload};
pub use staging::{MemoryStaging, StagedArtifact, StagingArea, TempDirStaging};
