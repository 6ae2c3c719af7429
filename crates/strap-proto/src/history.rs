//! Historical record layout inside a `HistoricalData` packet
//!
//! | Offset | Size | Field                          |
//! |--------|------|--------------------------------|
//! | 0      | 4    | record sequence                |
//! | 4      | 4    | unix seconds (LE)              |
//! | 8      | 2    | subseconds, 1/32768 s (LE)     |
//! | 10     | 4    | reserved                       |
//! | 14     | 1    | heart rate (bpm)               |
//! | 15     | 1    | R-R interval count             |
//! | 16     | 2*n  | R-R intervals in ms (LE)       |

use strap_core::record::SUBSEC_TICKS_PER_SECOND;
use strap_core::HistoryRecord;

use crate::error::{FrameError, RecordError};
use crate::packet::{PacketType, WhoopPacket};

const UNIX_OFFSET: usize = 4;
const SUBSEC_OFFSET: usize = 8;
const HEART_RATE_OFFSET: usize = 14;
const RR_COUNT_OFFSET: usize = 15;
const RR_OFFSET: usize = 16;

/// Fixed part of a record
pub const RECORD_HEADER_LEN: usize = RR_OFFSET;
/// Most R-R intervals a single record carries
pub const MAX_RR_INTERVALS: usize = 4;

/// Decode a record from a historical packet's data
pub fn parse_record(data: &[u8]) -> Result<HistoryRecord, RecordError> {
    if data.len() < RECORD_HEADER_LEN {
        return Err(RecordError::TooShort {
            expected: RECORD_HEADER_LEN,
            actual: data.len(),
        });
    }

    let unix = read_u32(data, UNIX_OFFSET);
    let subsec = read_u16(data, SUBSEC_OFFSET);
    if u32::from(subsec) >= SUBSEC_TICKS_PER_SECOND {
        return Err(RecordError::SubsecondOutOfRange(subsec));
    }
    let heart_rate = data[HEART_RATE_OFFSET];
    let rr_count = data[RR_COUNT_OFFSET];

    if usize::from(rr_count) > MAX_RR_INTERVALS {
        return Err(RecordError::TooManyIntervals(rr_count));
    }

    let rr_end = RR_OFFSET + 2 * usize::from(rr_count);
    if data.len() < rr_end {
        return Err(RecordError::TooShort {
            expected: rr_end,
            actual: data.len(),
        });
    }

    let rr = (0..usize::from(rr_count))
        .map(|i| read_u16(data, RR_OFFSET + 2 * i))
        .collect();

    Ok(HistoryRecord::new(unix, subsec, heart_rate, rr))
}

/// Encode a record in the layout [`parse_record`] reads
///
/// Records with more than [`MAX_RR_INTERVALS`] intervals are rejected. Other
/// fields are written as given, so out-of-range values can be produced for
/// exercising the reader.
pub fn encode_record(sequence: u32, record: &HistoryRecord) -> Result<Vec<u8>, RecordError> {
    if record.rr.len() > MAX_RR_INTERVALS {
        return Err(RecordError::TooManyIntervals(record.rr.len().min(255) as u8));
    }

    let mut data = Vec::with_capacity(RECORD_HEADER_LEN + 2 * record.rr.len());
    data.extend_from_slice(&sequence.to_le_bytes());
    data.extend_from_slice(&record.unix.to_le_bytes());
    data.extend_from_slice(&record.subsec.to_le_bytes());
    data.extend_from_slice(&[0; 4]);
    data.push(record.heart_rate);
    data.push(record.rr.len() as u8);
    for rr in &record.rr {
        data.extend_from_slice(&rr.to_le_bytes());
    }
    Ok(data)
}

/// Build the complete frame a strap sends for one historical record
pub fn history_frame(sequence: u32, record: &HistoryRecord) -> Result<Vec<u8>, FrameError> {
    let data = encode_record(sequence, record)?;
    WhoopPacket::new(PacketType::HistoricalData, (sequence & 0xFF) as u8, 0, data).framed()
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
