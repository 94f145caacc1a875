//! Bit-level reader for RADC encoded data streams.

use crate::error::{DecodeError, Result};

/// An MSB-first bit reader with a one-byte lookahead.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the next byte to load.
    next: usize,
    /// The partially consumed byte, left-aligned.
    current: u8,
    /// Unread bits left in `current` (0-8).
    remaining: u8,
}

impl<'a> BitReader<'a> {
    #[inline(always)]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            next: 0,
            current: 0,
            remaining: 0,
        }
    }

    /// Drop the unread bits of the current byte.
    ///
    /// The next read starts at the following byte boundary.
    #[inline(always)]
    pub(crate) fn reset(&mut self) {
        self.current = 0;
        self.remaining = 0;
    }

    #[inline(always)]
    fn refill(&mut self) -> Result<()> {
        self.current = *self.data.get(self.next).ok_or(DecodeError::Truncated)?;
        self.next += 1;
        self.remaining = 8;

        Ok(())
    }

    #[inline(always)]
    pub(crate) fn read_bit(&mut self) -> Result<u32> {
        if self.remaining == 0 {
            self.refill()?;
        }

        let bit = (self.current >> 7) as u32;
        self.current <<= 1;
        self.remaining -= 1;

        Ok(bit)
    }

    /// Read `num_bits` (at most 8) bits, MSB first.
    #[inline(always)]
    pub(crate) fn read_bits(&mut self, num_bits: u8) -> Result<u32> {
        debug_assert!(num_bits <= 8);

        let mut result = 0_u32;

        for _ in 0..num_bits {
            result = (result << 1) | self.read_bit()?;
        }

        Ok(result)
    }

    /// The number of bits consumed since the start of the stream.
    #[inline(always)]
    pub(crate) fn bits_consumed(&self) -> usize {
        self.next * 8 - self.remaining as usize
    }
}
