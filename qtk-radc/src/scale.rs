//! Per-band brightness multipliers.
//!
//! Every band is quantized with its own 6-bit multiplier. The predictor state
//! carried over from the previous band was built with the previous
//! multiplier, so it has to be brought onto the new scale before it can seed
//! the next band.

use crate::bit_reader::BitReader;
use crate::error::Result;
use crate::log::ltrace;
use crate::predictor::RowBuffer;

/// `LAST_SCALE[m]` is `4096 / m`, rounded to nearest.
pub(crate) const LAST_SCALE: [u16; 256] = build_last_scale();

const fn build_last_scale() -> [u16; 256] {
    let mut table = [0; 256];
    let mut m = 1;

    while m < 256 {
        table[m] = ((4096 + m / 2) / m) as u16;
        m += 1;
    }

    table
}

/// The multiplier assumed before the first band.
const INITIAL_MULTIPLIER: u8 = 16;

#[derive(Debug, Clone)]
pub(crate) struct ScaleTracker {
    previous: u8,
}

impl ScaleTracker {
    pub(crate) fn new() -> Self {
        Self {
            previous: INITIAL_MULTIPLIER,
        }
    }

    /// Read the header of the next band and rescale `buffer` accordingly.
    ///
    /// Returns the multiplier of the new band.
    pub(crate) fn begin_band(
        &mut self,
        reader: &mut BitReader<'_>,
        buffer: &mut RowBuffer,
    ) -> Result<u8> {
        let multiplier = reader.read_bits(6)? as u8;
        // The chroma multipliers are not needed for a luma-only decode.
        reader.read_bits(6)?;
        reader.read_bits(6)?;

        ltrace!("band multiplier {multiplier}");

        let factor = LAST_SCALE[self.previous as usize] as i64 * multiplier as i64;
        buffer.rescale(|cell| ((cell as i64 * factor - 1) >> 12) as i16);
        self.previous = multiplier;

        Ok(multiplier)
    }
}
