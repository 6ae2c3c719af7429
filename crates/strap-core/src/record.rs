//! Decoded history records and their response shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Strap RTC sub-second ticks per second
pub const SUBSEC_TICKS_PER_SECOND: u32 = 32_768;

/// One decoded heart-rate sample from the strap's history buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Seconds since the Unix epoch (strap clock)
    pub unix: u32,
    /// Sub-second part, in 1/32768 s ticks
    pub subsec: u16,
    /// Heart rate in beats per minute
    pub heart_rate: u8,
    /// R-R intervals in milliseconds, in the order the strap reported them
    pub rr: Vec<u16>,
}

impl HistoryRecord {
    pub fn new(unix: u32, subsec: u16, heart_rate: u8, rr: Vec<u16>) -> Self {
        Self {
            unix,
            subsec,
            heart_rate,
            rr,
        }
    }

    /// Wall-clock instant of this sample.
    ///
    /// Derived from `unix` and `subsec` on every call; it has no side effects.
    /// A `subsec` of a full second or more carries into the seconds.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let subsec_nanos =
            i64::from(self.subsec) * 1_000_000_000 / i64::from(SUBSEC_TICKS_PER_SECOND);
        // u32 seconds plus under two seconds of ticks stays far inside i64 nanos
        DateTime::from_timestamp_nanos(i64::from(self.unix) * 1_000_000_000 + subsec_nanos)
    }
}

/// JSON shape of a record in the parse-history response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Sample time (RFC 3339, UTC)
    pub timestamp: DateTime<Utc>,
    /// Heart rate in beats per minute
    pub heart_rate: u8,
    /// R-R intervals in milliseconds
    pub rr_intervals: Vec<u16>,
}

impl From<&HistoryRecord> for RecordPayload {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            timestamp: record.timestamp(),
            heart_rate: record.heart_rate,
            rr_intervals: record.rr.clone(),
        }
    }
}

impl From<HistoryRecord> for RecordPayload {
    fn from(record: HistoryRecord) -> Self {
        Self {
            timestamp: record.timestamp(),
            heart_rate: record.heart_rate,
            rr_intervals: record.rr,
        }
    }
}
