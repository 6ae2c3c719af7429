//! Sequential frame reading over a captured notification stream

use crate::error::FrameError;
use crate::packet::WhoopPacket;

/// Iterates the frames of a concatenated stream
///
/// Yields `(offset, packet)` pairs. The first error ends the iteration, since
/// there is no way to resynchronise on a stream without frame boundaries.
pub struct FrameReader<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            failed: false,
        }
    }
}

impl Iterator for FrameReader<'_> {
    type Item = Result<(usize, WhoopPacket), (usize, FrameError)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        let start = self.offset;
        match WhoopPacket::from_frame(&self.buf[start..]) {
            Ok((packet, consumed)) => {
                self.offset += consumed;
                Some(Ok((start, packet)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err((start, e)))
            }
        }
    }
}

impl std::iter::FusedIterator for FrameReader<'_> {}
