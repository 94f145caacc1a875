//! Tone curve.

use std::sync::LazyLock;

use crate::error::{CurveError, Result, bail};

/// The breakpoints of the sensor's default tone curve.
pub const DEFAULT_BREAKPOINTS: [(u16, u16); 6] = [
    (0, 0),
    (1280, 1344),
    (2320, 3616),
    (3328, 8000),
    (4095, 16383),
    (65535, 16383),
];

static DEFAULT_CURVE: LazyLock<ToneCurve> = LazyLock::new(|| ToneCurve {
    table: interpolate(&DEFAULT_BREAKPOINTS),
});

/// A piecewise-linear remap of the 16-bit sample domain.
#[derive(Clone, PartialEq, Eq)]
pub struct ToneCurve {
    table: Box<[u16]>,
}

impl ToneCurve {
    /// Build a curve through the given `(x, y)` breakpoints.
    ///
    /// The x coordinates must be strictly increasing, start at 0 and end at
    /// 65535. Values between two breakpoints are linearly interpolated and
    /// rounded to nearest.
    pub fn new(breakpoints: &[(u16, u16)]) -> Result<Self> {
        if breakpoints.len() < 2 {
            bail!(CurveError::TooFewPoints);
        }

        if breakpoints[0].0 != 0 || breakpoints[breakpoints.len() - 1].0 != u16::MAX {
            bail!(CurveError::InvalidDomain);
        }

        if breakpoints.windows(2).any(|w| w[0].0 >= w[1].0) {
            bail!(CurveError::NotIncreasing);
        }

        Ok(Self {
            table: interpolate(breakpoints),
        })
    }

    /// The shared default curve.
    pub fn default_curve() -> &'static Self {
        &DEFAULT_CURVE
    }

    /// Look up the curve value of `value`.
    #[inline(always)]
    pub fn apply(&self, value: u16) -> u16 {
        self.table[value as usize]
    }

    /// Look up `value` and reduce it to 8 bits, saturating at 255.
    #[inline(always)]
    pub fn to_display(&self, value: u16, shift: u8) -> u8 {
        self.apply(value)
            .checked_shr(shift as u32)
            .unwrap_or(0)
            .min(255) as u8
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::default_curve().clone()
    }
}

impl core::fmt::Debug for ToneCurve {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToneCurve")
            .field("max", &self.table[self.table.len() - 1])
            .finish_non_exhaustive()
    }
}

fn interpolate(breakpoints: &[(u16, u16)]) -> Box<[u16]> {
    let mut table = vec![0_u16; 1 << 16].into_boxed_slice();

    for w in breakpoints.windows(2) {
        let (x0, y0) = (w[0].0 as i64, w[0].1 as i64);
        let (x1, y1) = (w[1].0 as i64, w[1].1 as i64);
        let dx = x1 - x0;

        for x in x0..=x1 {
            let y = y0 + ((x - x0) * (y1 - y0) * 2 + dx).div_euclid(2 * dx);
            table[x as usize] = y as u16;
        }
    }

    table
}
