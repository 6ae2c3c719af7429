//! strap-proto - WHOOP strap wire format
//!
//! The strap talks over BLE in CRC-protected frames (see [`packet`]). When it
//! dumps its history buffer, the client captures every data notification into
//! one file: a plain concatenation of frames. [`WhoopHistoryDecoder`] reads
//! such a file back into [`strap_core::HistoryRecord`]s.
//!
//! # Usage
//!
//! ```ignore
//! use strap_core::HistoryDecoder;
//! use strap_proto::WhoopHistoryDecoder;
//!
//! let records = WhoopHistoryDecoder::new().parse(Path::new("historical_data_stream.bin"))?;
//! ```

pub mod decoder;
pub mod error;
pub mod frames;
pub mod history;
pub mod packet;

pub use decoder::WhoopHistoryDecoder;
pub use error::{FrameError, RecordError};
pub use frames::FrameReader;
pub use packet::{PacketType, WhoopPacket};
