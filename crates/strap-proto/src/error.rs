//! Wire format errors

use strap_core::DecodeError;
use thiserror::Error;

/// Errors reading a single frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Not enough bytes left for the frame
    #[error("truncated frame: need {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// First byte is not the start-of-frame marker
    #[error("bad start of frame 0x{0:02X}")]
    StartOfFrame(u8),

    /// CRC-8 over the length field does not match
    #[error("header CRC mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    HeaderCrc { expected: u8, actual: u8 },

    /// Length field is too small to hold a packet header and CRC
    #[error("invalid frame length {0}")]
    InvalidLength(u16),

    /// CRC-32 over the payload does not match
    #[error("payload CRC mismatch: expected 0x{expected:08X}, got 0x{actual:08X}")]
    PayloadCrc { expected: u32, actual: u32 },

    /// Payload too large for the 16-bit length field
    #[error("payload of {0} bytes does not fit in a frame")]
    PayloadTooLarge(usize),

    /// Record could not be encoded into a frame
    #[error("invalid record: {0}")]
    Record(#[from] RecordError),
}

impl FrameError {
    /// Attach the frame's byte offset within the stream
    pub fn at(self, offset: usize) -> DecodeError {
        DecodeError::Frame {
            offset,
            reason: self.to_string(),
        }
    }
}

/// Errors decoding a historical record from a packet's data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Data too short for the fixed header or the announced R-R intervals
    #[error("record too short: expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// R-R count above what a record can carry
    #[error("R-R interval count {0} exceeds maximum of 4")]
    TooManyIntervals(u8),

    /// Sub-second tick count of a full second or more
    #[error("subsecond value {0} out of range (must be below 32768)")]
    SubsecondOutOfRange(u16),
}

impl RecordError {
    /// Attach the owning frame's byte offset within the stream
    pub fn at(self, offset: usize) -> DecodeError {
        DecodeError::Record {
            offset,
            reason: self.to_string(),
        }
    }
}
