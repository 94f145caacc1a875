//! Helpers for building synthetic RADC streams in tests.

use crate::huffman::{
    HuffmanTables, LITERAL, LITERAL_MODE, LiteralPrecision, RUN_LENGTH, STEP, residual_tree,
};

/// Packs bits MSB-first into bytes.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    output: Vec<u8>,
    /// Pending bits, right-aligned.
    bits: u32,
    count: u8,
    written: usize,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write the low `num_bits` bits of `value`.
    pub(crate) fn write(&mut self, value: u32, num_bits: u8) {
        debug_assert!(num_bits <= 24);

        self.bits = (self.bits << num_bits) | (value & ((1 << num_bits) - 1));
        self.count += num_bits;
        self.written += num_bits as usize;

        while self.count >= 8 {
            self.count -= 8;
            self.output.push((self.bits >> self.count) as u8);
            self.bits &= (1 << self.count) - 1;
        }
    }

    pub(crate) fn bits_written(&self) -> usize {
        self.written
    }

    /// Flush the pending bits, padding with zeros.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.count > 0 {
            self.output.push((self.bits << (8 - self.count)) as u8);
        }

        self.output
    }
}

/// Encodes RADC symbols with the canonical codes of the shared tables.
pub(crate) struct StreamBuilder {
    tables: &'static HuffmanTables,
    writer: BitWriter,
}

impl StreamBuilder {
    pub(crate) fn new(tables: &'static HuffmanTables) -> Self {
        Self {
            tables,
            writer: BitWriter::new(),
        }
    }

    /// Emit the code of `value` in `tree`.
    pub(crate) fn symbol(&mut self, tree: usize, value: u8) -> &mut Self {
        let (index, entry) = (0..=255_u8)
            .map(|i| (i, self.tables.entry(tree, i)))
            .find(|(_, e)| e.value == value)
            .unwrap_or_else(|| panic!("tree {tree} has no symbol {value}"));

        self.writer
            .write((index >> (8 - entry.length)) as u32, entry.length);
        self
    }

    pub(crate) fn signed(&mut self, tree: usize, value: i8) -> &mut Self {
        self.symbol(tree, value as u8)
    }

    /// Emit the band header: the multiplier and two ignored fields.
    pub(crate) fn band(&mut self, multiplier: u8) -> &mut Self {
        self.raw(multiplier as u32, 6).raw(0, 6).raw(0, 6)
    }

    pub(crate) fn control(&mut self, tree: usize, next: usize) -> &mut Self {
        self.symbol(tree, next as u8)
    }

    /// Emit one literal escape carrying the raw bits `raw`.
    pub(crate) fn literal(&mut self, raw: u8) -> &mut Self {
        let length = self.tables.entry(LITERAL, 0).length;
        self.raw(raw as u32, length)
    }

    /// Emit a literal group reached from control tree `tree`.
    pub(crate) fn literal_group(&mut self, tree: usize, raws: [u8; 4]) -> &mut Self {
        self.control(tree, LITERAL_MODE);
        for raw in raws {
            self.literal(raw);
        }
        self
    }

    /// Emit a predicted group reached from control tree `tree`.
    pub(crate) fn predicted_group(
        &mut self,
        tree: usize,
        mode: usize,
        residuals: [i8; 4],
    ) -> &mut Self {
        self.control(tree, mode);
        for residual in residuals {
            self.signed(residual_tree(mode), residual);
        }
        self
    }

    pub(crate) fn run_length(&mut self, nreps: u8) -> &mut Self {
        self.symbol(RUN_LENGTH, nreps - 1)
    }

    pub(crate) fn step(&mut self, step: i8) -> &mut Self {
        self.signed(STEP, step)
    }

    pub(crate) fn raw(&mut self, value: u32, num_bits: u8) -> &mut Self {
        self.writer.write(value, num_bits);
        self
    }

    pub(crate) fn bits_written(&self) -> usize {
        self.writer.bits_written()
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}

/// A 5-bit stream of `width`×`height` pixels in which every group of every
/// round is a literal group carrying `raw`.
pub(crate) fn literal_stream(width: u32, height: u32, multiplier: u8, raw: u8) -> Vec<u8> {
    let mut stream = StreamBuilder::new(HuffmanTables::get(LiteralPrecision::FiveBit));
    let groups = width / 4;

    for _ in 0..height / 4 {
        stream.band(multiplier);

        // Two kept and two discarded rounds.
        for _ in 0..4 {
            stream.literal_group(1, [raw; 4]);

            for _ in 1..groups {
                stream.literal_group(LITERAL_MODE, [raw; 4]);
            }
        }
    }

    stream.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_writer_packs_msb_first() {
        let mut writer = BitWriter::new();
        writer.write(0b1, 1);
        writer.write(0b011, 3);
        writer.write(0b0010_01, 6);
        assert_eq!(writer.bits_written(), 10);
        assert_eq!(writer.finish(), vec![0b1011_0010, 0b0100_0000]);
    }
}
