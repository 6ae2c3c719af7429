//! HistoryDecoder implementation for captured strap history streams

use std::collections::HashMap;
use std::path::Path;

use strap_core::{DecodeError, DecodeResult, HistoryDecoder, HistoryRecord};
use tracing::debug;

use crate::frames::FrameReader;
use crate::history::parse_record;
use crate::packet::PacketType;

/// Decodes the historical data stream the client records from the strap's
/// data characteristic
///
/// Only `HistoricalData` packets produce records; metadata, console logs and
/// other packets interleaved in the stream are skipped. Any corrupt frame or
/// record fails the whole decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhoopHistoryDecoder;

impl WhoopHistoryDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode an in-memory stream
    pub fn decode(&self, stream: &[u8]) -> DecodeResult<Vec<HistoryRecord>> {
        if stream.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut records = Vec::new();
        let mut skipped: HashMap<PacketType, usize> = HashMap::new();

        for frame in FrameReader::new(stream) {
            let (offset, packet) = frame.map_err(|(offset, e)| e.at(offset))?;

            if packet.packet_type != PacketType::HistoricalData {
                *skipped.entry(packet.packet_type).or_default() += 1;
                continue;
            }

            let record = parse_record(&packet.data).map_err(|e| e.at(offset))?;
            records.push(record);
        }

        if !skipped.is_empty() {
            debug!(
                records = records.len(),
                skipped = ?skipped,
                "Skipped non-historical packets"
            );
        }

        Ok(records)
    }
}

impl HistoryDecoder for WhoopHistoryDecoder {
    fn parse(&self, path: &Path) -> DecodeResult<Vec<HistoryRecord>> {
        let stream = std::fs::read(path)?;
        self.decode(&stream)
    }

    fn name(&self) -> &str {
        "whoop-history"
    }
}
