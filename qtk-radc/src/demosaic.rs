//! Color filter array handling.
//!
//! The decoder reconstructs luma on one checkerboard parity and leaves the
//! other parity at a neutral baseline. [`checkerboard`] folds the two
//! together; the result is an 8-bit mosaic that a [`Demosaic`] implementation
//! turns into the final gray plane.

use core::ops::Range;

/// The neutral value of the odd-parity samples.
pub(crate) const CHROMA_BASELINE: i32 = 2048;

/// A color of the filter array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaColor {
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
}

/// The 2×2 tile of the color filter array, listed row by row from the
/// top-left pixel of the image.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CfaPattern {
    /// `R G / G B`.
    #[default]
    Rggb,
    /// `B G / G R`.
    Bggr,
    /// `G R / B G`.
    Grbg,
    /// `G B / R G`.
    Gbrg,
}

impl CfaPattern {
    /// The color of the filter covering pixel `(x, y)`.
    pub fn color_at(self, x: usize, y: usize) -> CfaColor {
        use CfaColor::{Blue as B, Green as G, Red as R};

        let tile = match self {
            Self::Rggb => [R, G, G, B],
            Self::Bggr => [B, G, G, R],
            Self::Grbg => [G, R, B, G],
            Self::Gbrg => [G, B, R, G],
        };

        tile[(y & 1) * 2 + (x & 1)]
    }
}

/// Turns an 8-bit CFA mosaic into the final pixel plane.
pub trait Demosaic {
    /// Demosaic `mosaic` into `out`.
    ///
    /// Both slices hold `width * height` samples in row-major order.
    fn demosaic(&self, mosaic: &[u8], width: u32, height: u32, cfa: CfaPattern, out: &mut [u8]);
}

/// The built-in demosaic implementations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DemosaicMethod {
    /// Pass the mosaic through unchanged.
    #[default]
    Identity,
    /// Average every pixel with its right, lower and lower-right neighbours.
    BoxSmooth,
    /// Bilinear interpolation of each color, reduced to luma.
    Bilinear,
}

impl Demosaic for DemosaicMethod {
    fn demosaic(&self, mosaic: &[u8], width: u32, height: u32, cfa: CfaPattern, out: &mut [u8]) {
        match self {
            Self::Identity => Identity.demosaic(mosaic, width, height, cfa, out),
            Self::BoxSmooth => BoxSmooth.demosaic(mosaic, width, height, cfa, out),
            Self::Bilinear => Bilinear.demosaic(mosaic, width, height, cfa, out),
        }
    }
}

/// Passes the mosaic through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Demosaic for Identity {
    fn demosaic(&self, mosaic: &[u8], _: u32, _: u32, _: CfaPattern, out: &mut [u8]) {
        out.copy_from_slice(mosaic);
    }
}

/// A 2×2 box filter anchored at each pixel, clamped at the right and bottom
/// edges. Every window covers one full CFA tile, so the pattern itself is not
/// needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxSmooth;

impl Demosaic for BoxSmooth {
    fn demosaic(&self, mosaic: &[u8], width: u32, height: u32, _: CfaPattern, out: &mut [u8]) {
        let (width, height) = (width as usize, height as usize);
        let at = |x: usize, y: usize| mosaic[y * width + x] as u32;

        for y in 0..height {
            let y1 = (y + 1).min(height - 1);

            for x in 0..width {
                let x1 = (x + 1).min(width - 1);
                let sum = at(x, y) + at(x1, y) + at(x, y1) + at(x1, y1);
                out[y * width + x] = ((sum + 2) / 4) as u8;
            }
        }
    }
}

/// Bilinear demosaic followed by an integer Rec. 601 luma conversion.
///
/// Each missing color of a pixel is the mean of the pixels of that color in
/// its 3×3 neighbourhood.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bilinear;

impl Demosaic for Bilinear {
    fn demosaic(&self, mosaic: &[u8], width: u32, height: u32, cfa: CfaPattern, out: &mut [u8]) {
        let (width, height) = (width as usize, height as usize);

        for y in 0..height {
            for x in 0..width {
                // Sum and count per color.
                let mut acc = [(0_u32, 0_u32); 3];

                for ny in y.saturating_sub(1)..(y + 2).min(height) {
                    for nx in x.saturating_sub(1)..(x + 2).min(width) {
                        let slot = &mut acc[cfa.color_at(nx, ny) as usize];
                        slot.0 += mosaic[ny * width + nx] as u32;
                        slot.1 += 1;
                    }
                }

                let own = cfa.color_at(x, y) as usize;
                acc[own] = (mosaic[y * width + x] as u32, 1);

                let [r, g, b] = acc.map(|(sum, count)| {
                    if count == 0 {
                        0
                    } else {
                        (sum + count / 2) / count
                    }
                });

                out[y * width + x] = ((77 * r + 150 * g + 29 * b + 128) >> 8) as u8;
            }
        }
    }
}

/// Fold the odd-parity samples of `rows` into their horizontal neighbours.
///
/// An odd-parity sample holds a deviation from [`CHROMA_BASELINE`]; it is
/// doubled and added to the mean of the two even-parity samples beside it.
pub(crate) fn checkerboard(samples: &mut [u16], width: usize, rows: Range<usize>) {
    for y in rows {
        let line = &mut samples[y * width..(y + 1) * width];

        for x in ((1 - (y & 1))..width).step_by(2) {
            let left = if x > 0 { x - 1 } else { x + 1 };
            let right = if x + 1 < width { x + 1 } else { x - 1 };

            let value = (line[x] as i32 - CHROMA_BASELINE) * 2
                + (line[left] as i32 + line[right] as i32) / 2;
            line[x] = value.clamp(0, u16::MAX as i32) as u16;
        }
    }
}
