//! The band loop.
//!
//! The image is decoded in bands of four rows. Each band reconstructs two
//! rounds of luma, which land on the even-parity positions of the sample
//! plane, and then skips over two rounds of chroma data.

use crate::bit_reader::BitReader;
use crate::demosaic::{CHROMA_BASELINE, checkerboard};
use crate::error::Result;
use crate::huffman::{HuffmanTables, LiteralPrecision};
use crate::log::{ldebug, lwarn};
use crate::predictor::{CUR, Discard, Reconstruct, RowBuffer, walk_round};
use crate::scale::ScaleTracker;
use crate::try_vec;

/// The number of image rows covered by one band.
pub(crate) const BAND_HEIGHT: usize = 4;

/// Decode `data` into a full-resolution plane of 16-bit linear samples.
///
/// The geometry must already be validated.
pub(crate) fn decode_samples(
    data: &[u8],
    width: usize,
    height: usize,
    precision: LiteralPrecision,
) -> Result<Vec<u16>> {
    let tables = HuffmanTables::get(precision);
    let mut reader = BitReader::new(data);
    let mut buffer = RowBuffer::new(width / 2)?;
    let mut scale = ScaleTracker::new();
    let mut samples = try_vec(width * height, CHROMA_BASELINE as u16)?;

    let columns = buffer.columns();

    for row in (0..height).step_by(BAND_HEIGHT) {
        let multiplier = scale.begin_band(&mut reader, &mut buffer)?;

        if multiplier == 0 {
            lwarn!("band at row {row} has a zero multiplier");
        }

        for round in 0..2 {
            let mut sink = Reconstruct::new(&mut buffer, multiplier);
            walk_round(tables, &mut reader, columns, &mut sink)?;

            emit(&buffer, multiplier, &mut samples, width, row + 2 * round);
            buffer.carry_forward();
        }

        for _ in 0..2 {
            walk_round(tables, &mut reader, columns, &mut Discard)?;
        }

        checkerboard(&mut samples, width, row..row + BAND_HEIGHT);
    }

    reader.reset();
    ldebug!(
        "consumed {} of {} bytes",
        reader.bits_consumed() / 8,
        data.len()
    );

    Ok(samples)
}

/// Write the two rows of the last round into the sample plane, starting at
/// image row `top`.
///
/// Cell `x` of the first row lands in column `2x`, cell `x` of the second row
/// in column `2x + 1`.
fn emit(buffer: &RowBuffer, multiplier: u8, samples: &mut [u16], width: usize, top: usize) {
    for y in 0..2 {
        let line = &mut samples[(top + y) * width..][..width];

        for x in 0..buffer.columns() {
            let value = if multiplier == 0 {
                0
            } else {
                ((buffer.get(CUR + y, x) as i32) << 4) / multiplier as i32
            };

            line[2 * x + y] = value.clamp(0, u16::MAX as i32) as u16;
        }
    }
}
