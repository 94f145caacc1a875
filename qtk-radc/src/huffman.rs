//! The fixed Huffman tables of the RADC format.
//!
//! All 18 variable-length tables are described by a single list of
//! `(code length, value)` pairs. Codes are assigned canonically in list
//! order: each entry occupies the next `256 >> length` slots of a dense
//! 256-slot table, so a table is complete once its slots sum up to 256 and
//! the next table starts right after it. A nineteenth table holds the
//! literal escapes, which are not entropy coded at all.

use std::sync::LazyLock;

use crate::bit_reader::BitReader;
use crate::error::{HuffmanError, Result, err};

/// Number of tables, including the literal table.
pub(crate) const NUM_TABLES: usize = 19;

/// Control trees occupy tables `0..=8`. The decoded value both selects the
/// decode mode of the next group and the control tree used for the group after.
pub(crate) const LITERAL_MODE: usize = 8;
/// Repeat counts of run-length mode.
pub(crate) const RUN_LENGTH: usize = 9;
/// Bias steps applied on every odd repeat of run-length mode.
pub(crate) const STEP: usize = 10;
/// Uniform-width literal escapes.
pub(crate) const LITERAL: usize = 18;

/// The residual table used by predicted mode `tree` (1-7).
#[inline(always)]
pub(crate) const fn residual_tree(tree: usize) -> usize {
    tree + 10
}

#[rustfmt::skip]
const CODES: [(u8, i8); 130] = [
    // Control trees.
    (1,1), (2,3), (3,4), (4,2), (5,7), (6,5), (7,6), (7,8),
    (1,0), (2,1), (3,3), (4,4), (5,2), (6,7), (7,6), (8,5), (8,8),
    (2,1), (2,3), (3,0), (3,2), (3,4), (4,6), (5,5), (6,7), (6,8),
    (2,0), (2,1), (2,3), (3,2), (4,4), (5,6), (6,7), (7,5), (7,8),
    (2,1), (2,4), (3,0), (3,2), (3,3), (4,7), (5,5), (6,6), (6,8),
    (2,3), (3,1), (3,2), (3,4), (3,5), (3,6), (4,7), (5,0), (5,8),
    (2,3), (2,6), (3,0), (3,1), (4,4), (4,5), (4,7), (5,2), (5,8),
    (2,4), (2,7), (3,3), (3,6), (4,1), (4,2), (4,5), (5,0), (5,8),
    (2,6), (3,1), (3,3), (3,5), (3,7), (3,8), (4,0), (5,2), (5,4),
    // Run lengths.
    (2,0), (2,1), (3,2), (3,3), (4,4), (4,5), (5,6), (5,7), (4,8),
    // Steps.
    (1,0), (2,2), (2,-2),
    // Residuals for predicted modes 1-7.
    (1,-3), (1,3),
    (2,-17), (2,-5), (2,5), (2,17),
    (2,-7), (2,2), (2,9), (2,18),
    (2,-18), (2,-9), (2,-2), (2,7),
    (2,-28), (2,28), (3,-49), (3,-9), (3,9), (4,49), (5,-79), (5,79),
    (2,-1), (2,13), (2,26), (3,39), (4,-16), (5,55), (6,-37), (6,76),
    (2,-26), (2,-13), (2,1), (3,-39), (4,16), (5,-55), (6,-76), (6,37),
];

/// A single table slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    /// The length of the code in bits.
    pub(crate) length: u8,
    /// The decoded symbol. Signed symbols are stored in two's complement.
    pub(crate) value: u8,
}

/// The number of raw bits a literal escape carries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LiteralPrecision {
    /// 5-bit literals, as written by the QuickTake 150.
    #[default]
    FiveBit,
    /// 6-bit literals, as written by some Kodak cameras using the same scheme.
    SixBit,
}

impl LiteralPrecision {
    /// How far the raw literal bits are shifted into the top of a byte.
    pub(crate) fn shift(self) -> u8 {
        match self {
            Self::FiveBit => 3,
            Self::SixBit => 2,
        }
    }
}

static FIVE_BIT_TABLES: LazyLock<HuffmanTables> =
    LazyLock::new(|| HuffmanTables::build(LiteralPrecision::FiveBit));
static SIX_BIT_TABLES: LazyLock<HuffmanTables> =
    LazyLock::new(|| HuffmanTables::build(LiteralPrecision::SixBit));

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HuffmanTables {
    tables: Box<[[Entry; 256]; NUM_TABLES]>,
}

impl HuffmanTables {
    /// The shared tables for the given literal precision.
    pub(crate) fn get(precision: LiteralPrecision) -> &'static Self {
        match precision {
            LiteralPrecision::FiveBit => &FIVE_BIT_TABLES,
            LiteralPrecision::SixBit => &SIX_BIT_TABLES,
        }
    }

    pub(crate) fn build(precision: LiteralPrecision) -> Self {
        let mut tables = Box::new([[Entry::default(); 256]; NUM_TABLES]);

        let mut slot = 0;
        for (length, value) in CODES {
            let entry = Entry {
                length,
                value: value as u8,
            };

            for _ in 0..(256 >> length) {
                tables[slot / 256][slot % 256] = entry;
                slot += 1;
            }
        }

        debug_assert_eq!(slot, LITERAL * 256);

        let shift = precision.shift();
        for (c, entry) in tables[LITERAL].iter_mut().enumerate() {
            *entry = Entry {
                length: 8 - shift,
                value: ((c as u8) >> shift << shift) | (1 << (shift - 1)),
            };
        }

        Self { tables }
    }

    #[inline(always)]
    pub(crate) fn entry(&self, tree: usize, index: u8) -> Entry {
        self.tables[tree][index as usize]
    }

    /// Decode the next symbol of `tree`.
    ///
    /// Bits are pulled one at a time; the growing prefix is left-aligned into
    /// a table index and decoding stops as soon as the slot's code length
    /// equals the number of bits read.
    #[inline(always)]
    pub(crate) fn decode(&self, reader: &mut BitReader<'_>, tree: usize) -> Result<u8> {
        let mut prefix = 0_u32;

        for length in 1..=8_u8 {
            prefix = (prefix << 1) | reader.read_bit()?;
            let entry = self.entry(tree, (prefix << (8 - length)) as u8);

            if entry.length == length {
                return Ok(entry.value);
            }
        }

        err!(HuffmanError::InvalidCode)
    }

    /// Decode a signed symbol (residual, step or repeat count).
    #[inline(always)]
    pub(crate) fn decode_signed(&self, reader: &mut BitReader<'_>, tree: usize) -> Result<i8> {
        self.decode(reader, tree).map(|v| v as i8)
    }

    /// Decode a literal escape.
    #[inline(always)]
    pub(crate) fn decode_literal(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        self.decode(reader, LITERAL)
    }
}
