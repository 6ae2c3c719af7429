//! Strap packet framing
//!
//! ```text
//! +------+-----------+------+-------------------------------+----------+
//! | 0xAA | len u16LE | crc8 | type | seq | cmd | data ...   | crc32 LE |
//! +------+-----------+------+-------------------------------+----------+
//!                            <---------- payload ---------->
//! ```
//!
//! `len` counts the payload plus its CRC-32. The CRC-8 covers the two length
//! bytes only; the CRC-32 covers the payload.

use crc::{Crc, CRC_32_ISO_HDLC, CRC_8_SMBUS};

use crate::error::FrameError;

/// Start-of-frame marker
pub const START_OF_FRAME: u8 = 0xAA;
/// Marker, length and header CRC
pub const HEADER_LEN: usize = 4;
/// Trailing payload CRC
pub const CRC32_LEN: usize = 4;
/// Type, sequence and command bytes at the start of every payload
pub const PAYLOAD_HEADER_LEN: usize = 3;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Packet type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    Command,
    CommandResponse,
    RealtimeData,
    RealtimeRawData,
    HistoricalData,
    Event,
    Metadata,
    ConsoleLogs,
    RealtimeImuDataStream,
    HistoricalImuDataStream,
    Unknown(u8),
}

impl From<u8> for PacketType {
    fn from(value: u8) -> Self {
        match value {
            35 => PacketType::Command,
            36 => PacketType::CommandResponse,
            40 => PacketType::RealtimeData,
            43 => PacketType::RealtimeRawData,
            47 => PacketType::HistoricalData,
            48 => PacketType::Event,
            49 => PacketType::Metadata,
            50 => PacketType::ConsoleLogs,
            51 => PacketType::RealtimeImuDataStream,
            52 => PacketType::HistoricalImuDataStream,
            other => PacketType::Unknown(other),
        }
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        match value {
            PacketType::Command => 35,
            PacketType::CommandResponse => 36,
            PacketType::RealtimeData => 40,
            PacketType::RealtimeRawData => 43,
            PacketType::HistoricalData => 47,
            PacketType::Event => 48,
            PacketType::Metadata => 49,
            PacketType::ConsoleLogs => 50,
            PacketType::RealtimeImuDataStream => 51,
            PacketType::HistoricalImuDataStream => 52,
            PacketType::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PacketType::Command => "command",
            PacketType::CommandResponse => "command_response",
            PacketType::RealtimeData => "realtime_data",
            PacketType::RealtimeRawData => "realtime_raw_data",
            PacketType::HistoricalData => "historical_data",
            PacketType::Event => "event",
            PacketType::Metadata => "metadata",
            PacketType::ConsoleLogs => "console_logs",
            PacketType::RealtimeImuDataStream => "realtime_imu_data_stream",
            PacketType::HistoricalImuDataStream => "historical_imu_data_stream",
            PacketType::Unknown(other) => return write!(f, "unknown({})", other),
        };
        f.write_str(s)
    }
}

/// A decoded strap packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoopPacket {
    pub packet_type: PacketType,
    pub seq: u8,
    pub cmd: u8,
    pub data: Vec<u8>,
}

impl WhoopPacket {
    pub fn new(packet_type: PacketType, seq: u8, cmd: u8, data: Vec<u8>) -> Self {
        Self {
            packet_type,
            seq,
            cmd,
            data,
        }
    }

    /// Payload bytes: type, seq, cmd, data
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(PAYLOAD_HEADER_LEN + self.data.len());
        payload.push(self.packet_type.into());
        payload.push(self.seq);
        payload.push(self.cmd);
        payload.extend_from_slice(&self.data);
        payload
    }

    /// Encode as a complete frame
    pub fn framed(&self) -> Result<Vec<u8>, FrameError> {
        let payload = self.payload();
        let length = u16::try_from(payload.len() + CRC32_LEN)
            .map_err(|_| FrameError::PayloadTooLarge(payload.len()))?;
        let length_bytes = length.to_le_bytes();

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + CRC32_LEN);
        frame.push(START_OF_FRAME);
        frame.extend_from_slice(&length_bytes);
        frame.push(CRC8.checksum(&length_bytes));
        frame.extend_from_slice(&payload);
        frame.extend_from_slice(&CRC32.checksum(&payload).to_le_bytes());
        Ok(frame)
    }

    /// Decode the frame at the start of `buf`.
    ///
    /// Returns the packet and the number of bytes the frame occupied; bytes
    /// after the frame are left alone.
    pub fn from_frame(buf: &[u8]) -> Result<(Self, usize), FrameError> {
        if buf.len() < HEADER_LEN {
            return Err(FrameError::Truncated {
                needed: HEADER_LEN,
                available: buf.len(),
            });
        }
        if buf[0] != START_OF_FRAME {
            return Err(FrameError::StartOfFrame(buf[0]));
        }

        let length_bytes = [buf[1], buf[2]];
        let expected = buf[3];
        let actual = CRC8.checksum(&length_bytes);
        if expected != actual {
            return Err(FrameError::HeaderCrc { expected, actual });
        }

        let length = u16::from_le_bytes(length_bytes);
        let length_usize = usize::from(length);
        if length_usize < PAYLOAD_HEADER_LEN + CRC32_LEN {
            return Err(FrameError::InvalidLength(length));
        }

        let frame_len = HEADER_LEN + length_usize;
        if buf.len() < frame_len {
            return Err(FrameError::Truncated {
                needed: frame_len,
                available: buf.len(),
            });
        }

        let payload_end = frame_len - CRC32_LEN;
        let payload = &buf[HEADER_LEN..payload_end];
        let crc_bytes = &buf[payload_end..frame_len];
        let expected = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
        let actual = CRC32.checksum(payload);
        if expected != actual {
            return Err(FrameError::PayloadCrc { expected, actual });
        }

        let packet = WhoopPacket {
            packet_type: PacketType::from(payload[0]),
            seq: payload[1],
            cmd: payload[2],
            data: payload[PAYLOAD_HEADER_LEN..].to_vec(),
        };
        Ok((packet, frame_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crc_parameters() {
        // Standard check values for the two algorithms
        assert_eq!(CRC8.checksum(b"123456789"), 0xF4);
        assert_eq!(CRC32.checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_framed_layout() {
        // GET_BATTERY_LEVEL command as the client sends it
        let packet = WhoopPacket::new(PacketType::Command, 0, 26, vec![0x00]);
        let frame = packet.framed().unwrap();

        assert_eq!(frame.len(), HEADER_LEN + 4 + CRC32_LEN);
        assert_eq!(frame[0], START_OF_FRAME);
        assert_eq!(u16::from_le_bytes([frame[1], frame[2]]), 8);
        assert_eq!(frame[3], CRC8.checksum(&[8, 0]));
        assert_eq!(&frame[4..8], &[35, 0, 26, 0]);
        assert_eq!(
            &frame[8..12],
            &CRC32.checksum(&[35, 0, 26, 0]).to_le_bytes()
        );
    }

    #[test]
    fn test_from_frame_reads_back_and_reports_length() {
        let packet = WhoopPacket::new(PacketType::HistoricalData, 7, 1, vec![1, 2, 3, 4, 5]);
        let mut buf = packet.framed().unwrap();
        let frame_len = buf.len();
        buf.extend_from_slice(&[0xAA, 0xFF]);

        let (decoded, consumed) = WhoopPacket::from_frame(&buf).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(consumed, frame_len);
    }

    #[test]
    fn test_from_frame_bad_start() {
        let err = WhoopPacket::from_frame(&[0x00, 0x08, 0x00, 0x00]).unwrap_err();
        assert_eq!(err, FrameError::StartOfFrame(0x00));
    }

    #[test]
    fn test_from_frame_header_crc() {
        let mut frame = WhoopPacket::new(PacketType::Event, 0, 0, vec![])
            .framed()
            .unwrap();
        frame[3] ^= 0xFF;
        assert!(matches!(
            WhoopPacket::from_frame(&frame),
            Err(FrameError::HeaderCrc { .. })
        ));
    }

    #[test]
    fn test_from_frame_payload_crc() {
        let mut frame = WhoopPacket::new(PacketType::Metadata, 0, 0, vec![9, 9])
            .framed()
            .unwrap();
        frame[5] ^= 0x01;
        assert!(matches!(
            WhoopPacket::from_frame(&frame),
            Err(FrameError::PayloadCrc { .. })
        ));
    }

    #[test]
    fn test_from_frame_truncated() {
        let frame = WhoopPacket::new(PacketType::HistoricalData, 0, 0, vec![0; 20])
            .framed()
            .unwrap();
        let err = WhoopPacket::from_frame(&frame[..frame.len() - 1]).unwrap_err();
        assert_eq!(
            err,
            FrameError::Truncated {
                needed: frame.len(),
                available: frame.len() - 1
            }
        );

        let err = WhoopPacket::from_frame(&[0xAA, 0x08]).unwrap_err();
        assert_eq!(
            err,
            FrameError::Truncated {
                needed: HEADER_LEN,
                available: 2
            }
        );
    }

    #[test]
    fn test_from_frame_length_too_small() {
        let length_bytes = 3u16.to_le_bytes();
        let buf = [
            START_OF_FRAME,
            length_bytes[0],
            length_bytes[1],
            CRC8.checksum(&length_bytes),
            0,
            0,
            0,
        ];
        assert_eq!(
            WhoopPacket::from_frame(&buf).unwrap_err(),
            FrameError::InvalidLength(3)
        );
    }

    #[test]
    fn test_framed_rejects_oversize_payload() {
        let packet = WhoopPacket::new(PacketType::HistoricalData, 0, 0, vec![0; 70_000]);
        assert!(matches!(
            packet.framed(),
            Err(FrameError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_packet_type_codes() {
        assert_eq!(PacketType::from(47), PacketType::HistoricalData);
        assert_eq!(u8::from(PacketType::RealtimeData), 40);
        assert_eq!(PacketType::from(0x99), PacketType::Unknown(0x99));
        assert_eq!(u8::from(PacketType::Unknown(0x99)), 0x99);
        assert_eq!(PacketType::ConsoleLogs.to_string(), "console_logs");
        assert_eq!(PacketType::Unknown(7).to_string(), "unknown(7)");
    }
}
