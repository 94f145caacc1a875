//! Row-group reconstruction.
//!
//! A round decodes two rows at once, walking 2-pixel column pairs from right
//! to left. Each pair covers four cells: the current and the next row, each at
//! `col + 1` and `col`. A control symbol selects how the pair is coded:
//!
//! - `8`: four literal escapes, written straight into the buffer.
//! - `1..=7`: four residuals, added to the 2D prediction of each cell.
//! - `0`: a run of pairs that are predicted without residual, with a bias
//!   step added on every odd repeat.
//!
//! The symbol walk is shared between the rounds that reconstruct pixels and
//! the rounds whose data is thrown away, so both consume exactly the same bits.

use crate::bit_reader::BitReader;
use crate::error::Result;
use crate::huffman::{HuffmanTables, LITERAL_MODE, RUN_LENGTH, STEP, residual_tree};
use crate::try_vec;

/// The previously reconstructed row.
pub(crate) const PREV: usize = 0;
/// The first row of the current round.
pub(crate) const CUR: usize = 1;
/// The second row of the current round.
pub(crate) const NEXT: usize = 2;

/// The initial value of every cell.
const BASELINE: i16 = 2048;

/// A rolling window of three reconstruction rows.
///
/// Each row has one cell per column pair plus a trailing sentinel, which
/// is seeded with the band multiplier and only ever read as a predictor input.
#[derive(Debug, Clone)]
pub(crate) struct RowBuffer {
    rows: [Vec<i16>; 3],
    columns: usize,
}

impl RowBuffer {
    pub(crate) fn new(columns: usize) -> Result<Self> {
        Ok(Self {
            rows: [
                try_vec(columns + 1, BASELINE)?,
                try_vec(columns + 1, BASELINE)?,
                try_vec(columns + 1, BASELINE)?,
            ],
            columns,
        })
    }

    /// The number of cells per row, excluding the sentinel.
    #[inline(always)]
    pub(crate) fn columns(&self) -> usize {
        self.columns
    }

    #[inline(always)]
    pub(crate) fn get(&self, row: usize, col: usize) -> i16 {
        self.rows[row][col]
    }

    #[inline(always)]
    fn set(&mut self, row: usize, col: usize, value: i16) {
        self.rows[row][col] = value;
    }

    /// Apply `f` to every cell, sentinels included.
    pub(crate) fn rescale(&mut self, f: impl Fn(i16) -> i16) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = f(*cell);
        }
    }

    fn seed_sentinels(&mut self, multiplier: u8) {
        let seed = (multiplier as i16) << 7;
        self.rows[CUR][self.columns] = seed;
        self.rows[NEXT][self.columns] = seed;
    }

    /// Move the last reconstructed row into the predictor row, shifted right
    /// by one column.
    pub(crate) fn carry_forward(&mut self) {
        let (upper, lower) = self.rows.split_at_mut(NEXT);
        upper[PREV][1..].copy_from_slice(&lower[0][..self.columns]);
    }

    /// The 2D prediction of cell `(row, col)`.
    ///
    /// The neighbours are the cell already decoded to the right and the two
    /// cells above. The right-hand pair is averaged first.
    #[inline(always)]
    fn predict(&self, row: usize, col: usize) -> i16 {
        let up = self.get(row - 1, col) as i32;
        let up_right = self.get(row - 1, col + 1) as i32;
        let right = self.get(row, col + 1) as i32;

        ((((up_right + right) >> 1) + up) >> 1) as i16
    }

    #[cfg(test)]
    pub(crate) fn cells(&self) -> impl Iterator<Item = i16> + '_ {
        self.rows.iter().flatten().copied()
    }

    #[cfg(test)]
    pub(crate) fn row(&self, row: usize) -> &[i16] {
        &self.rows[row]
    }
}

/// The four cells of the column pair starting at `col`, in coding order.
#[inline(always)]
const fn group(col: usize) -> [(usize, usize); 4] {
    [(CUR, col + 1), (CUR, col), (NEXT, col + 1), (NEXT, col)]
}

/// Receives the decoded symbols of a round.
pub(crate) trait GroupSink {
    /// Four literal escapes for the pair at `col`.
    fn literals(&mut self, col: usize, literals: [u8; 4]);
    /// Four residuals for the pair at `col`.
    fn residuals(&mut self, col: usize, residuals: [i8; 4]);
    /// A repeat of the predictor for the pair at `col`.
    fn repeat(&mut self, col: usize);
    /// A bias step for the pair at `col`, following its repeat.
    fn step(&mut self, col: usize, step: i8);
}

/// Reconstructs a round into a [`RowBuffer`].
pub(crate) struct Reconstruct<'a> {
    buffer: &'a mut RowBuffer,
    multiplier: i16,
}

impl<'a> Reconstruct<'a> {
    /// Prepare `buffer` for a new round with the given band multiplier.
    pub(crate) fn new(buffer: &'a mut RowBuffer, multiplier: u8) -> Self {
        buffer.seed_sentinels(multiplier);

        Self {
            buffer,
            multiplier: multiplier as i16,
        }
    }
}

impl GroupSink for Reconstruct<'_> {
    fn literals(&mut self, col: usize, literals: [u8; 4]) {
        for ((row, x), literal) in group(col).into_iter().zip(literals) {
            self.buffer.set(row, x, literal as i16 * self.multiplier);
        }
    }

    fn residuals(&mut self, col: usize, residuals: [i8; 4]) {
        for ((row, x), residual) in group(col).into_iter().zip(residuals) {
            let value = ((residual as i16) << 4).wrapping_add(self.buffer.predict(row, x));
            self.buffer.set(row, x, value);
        }
    }

    fn repeat(&mut self, col: usize) {
        for (row, x) in group(col) {
            let value = self.buffer.predict(row, x);
            self.buffer.set(row, x, value);
        }
    }

    fn step(&mut self, col: usize, step: i8) {
        let step = (step as i16) << 4;

        for (row, x) in group(col) {
            let value = self.buffer.get(row, x).wrapping_add(step);
            self.buffer.set(row, x, value);
        }
    }
}

/// Drops every symbol of a round.
pub(crate) struct Discard;

impl GroupSink for Discard {
    fn literals(&mut self, _: usize, _: [u8; 4]) {}
    fn residuals(&mut self, _: usize, _: [i8; 4]) {}
    fn repeat(&mut self, _: usize) {}
    fn step(&mut self, _: usize, _: i8) {}
}

/// Walks the symbols of one round across `columns` cells.
pub(crate) fn walk_round(
    tables: &HuffmanTables,
    reader: &mut BitReader<'_>,
    columns: usize,
    sink: &mut impl GroupSink,
) -> Result<()> {
    let mut tree = 1;
    let mut col = columns;

    while col > 0 {
        tree = tables.decode(reader, tree)? as usize;

        match tree {
            0 => col = walk_run(tables, reader, col, sink)?,
            LITERAL_MODE => {
                col -= 2;

                let mut literals = [0; 4];
                for literal in &mut literals {
                    *literal = tables.decode_literal(reader)?;
                }

                sink.literals(col, literals);
            }
            _ => {
                col -= 2;

                let mut residuals = [0; 4];
                for residual in &mut residuals {
                    *residual = tables.decode_signed(reader, residual_tree(tree))?;
                }

                sink.residuals(col, residuals);
            }
        }
    }

    Ok(())
}

/// Walks a run-length sequence starting left of `col`. Returns the column
/// the run ended at.
fn walk_run(
    tables: &HuffmanTables,
    reader: &mut BitReader<'_>,
    mut col: usize,
    sink: &mut impl GroupSink,
) -> Result<usize> {
    loop {
        // A repeat count of 9 means that another count follows.
        let nreps = if col > 2 {
            tables.decode_signed(reader, RUN_LENGTH)? as i32 + 1
        } else {
            1
        };

        let mut rep = 0;
        while rep < 8 && rep < nreps && col > 0 {
            col -= 2;
            sink.repeat(col);

            if rep & 1 == 1 {
                sink.step(col, tables.decode_signed(reader, STEP)?);
            }

            rep += 1;
        }

        if nreps != 9 {
            return Ok(col);
        }
    }
}
