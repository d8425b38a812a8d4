//! MSB-first bit reader over destuffed entropy-coded data.

use crate::error::{JpegError, Result};

/// Reads bits most-significant first from a byte buffer.
///
/// The buffer must already be destuffed (see [`crate::EntropyStream`]); the reader treats
/// every byte as data. Bytes are pulled into the accumulator one at a time, only when a
/// request cannot be served from the bits already buffered, so after any successful
/// [`extract`](Self::extract) fewer than 8 bits remain buffered.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Next byte to pull into the accumulator.
    pos: usize,
    /// Buffered bits, right-aligned.
    acc: u32,
    /// Number of valid bits in `acc`.
    valid: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            pos: 0,
            acc: 0,
            valid: 0,
        }
    }

    /// Offset of the next byte that has not been pulled into the accumulator.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of buffered, not yet consumed bits.
    #[inline]
    pub fn buffered_bits(&self) -> u8 {
        self.valid
    }

    /// Whether every bit of the buffer has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.valid == 0 && self.pos >= self.data.len()
    }

    /// Read `count` bits (at most 16) as an unsigned value.
    pub fn extract(&mut self, count: u8) -> Result<u16> {
        debug_assert!(count <= 16);
        if count == 0 {
            return Ok(0);
        }

        while self.valid < count {
            let byte = *self.data.get(self.pos).ok_or(JpegError::Exhaustion {
                position: self.pos,
                requested: count,
            })?;
            self.acc = (self.acc << 8) | byte as u32;
            self.valid += 8;
            self.pos += 1;
        }

        let remaining = self.valid - count;
        let value = (self.acc >> remaining) as u16;
        self.acc &= (1u32 << remaining) - 1;
        self.valid = remaining;

        Ok(value)
    }

    #[inline]
    pub fn read_bit(&mut self) -> Result<u16> {
        self.extract(1)
    }

    /// Read `len` bits and interpret them as a JPEG signed magnitude.
    ///
    /// A leading 1 bit means the value is positive as read. Otherwise the value is the
    /// negated `len`-bit complement, so `0b0` is -1, `0b00` is -3 and so on.
    pub fn receive_extend(&mut self, len: u8) -> Result<i16> {
        if len == 0 {
            return Ok(0);
        }

        let raw = self.extract(len)? as i32;
        let value = if raw >> (len - 1) != 0 {
            raw
        } else {
            raw - (1 << len) + 1
        };

        Ok(value as i16)
    }

    /// Drop the buffered bits of a partially consumed byte.
    pub fn align(&mut self) {
        self.acc = 0;
        self.valid = 0;
    }

    /// Continue reading at byte `offset`, discarding buffered bits.
    pub fn seek(&mut self, offset: usize) {
        self.align();
        self.pos = offset.min(self.data.len());
    }
}
