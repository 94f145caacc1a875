/*!
A memory-safe, pure-Rust decoder for Apple QuickTake 150 raw images.

The QuickTake 150 stores its pictures in Kodak's RADC format: a Huffman coded,
row-predictive bitstream that is re-quantized in bands of four rows. This
crate reconstructs the luma plane of such a stream, runs it through the
camera's tone curve and returns an 8-bit gray image, which can be written out
as a binary PGM.

The decoder works on the bare pixel data. If you have a complete `.qtk` file,
use [`container::QtkHeader`] to find the geometry and the start of the data.

# Example
```rust,no_run
use qtk_radc::container::QtkHeader;
use qtk_radc::{DecodeSettings, decode};

let file = std::fs::read("image.qtk").unwrap();
let header = QtkHeader::parse(&file).unwrap();
let image = decode(
    header.payload(&file).unwrap(),
    header.width,
    header.height,
    &DecodeSettings::default(),
)
.unwrap();

std::fs::write("image.pgm", image.to_ppm().unwrap()).unwrap();
```

# Cargo features
- `image` (default): Integration with the [`image`](https://docs.rs/image)
  crate, including a decoding hook for `.qtk` files.
- `logging`: Forwards diagnostics to the [`log`](https://docs.rs/log) crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

use std::io::{self, Write};

mod bit_reader;
pub mod container;
pub mod curve;
mod decoder;
pub mod demosaic;
mod error;
mod huffman;
#[cfg(feature = "image")]
pub mod integration;
mod log;
pub mod ppm;
mod predictor;
mod scale;
#[cfg(test)]
mod test_utils;

pub use curve::ToneCurve;
pub use demosaic::{CfaPattern, Demosaic, DemosaicMethod};
pub use error::{
    ContainerError, CurveError, DecodeError, GeometryError, HuffmanError, Result,
};
pub use huffman::LiteralPrecision;

use crate::error::bail;
use crate::log::ldebug;

/// Settings that can be applied during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSettings {
    /// The width of the literal escapes in the bitstream.
    ///
    /// The QuickTake 150 writes 5-bit literals. Default is
    /// [`LiteralPrecision::FiveBit`].
    pub literal: LiteralPrecision,
    /// The color filter tile of the sensor, passed on to the demosaic step.
    ///
    /// Default is [`CfaPattern::Rggb`].
    pub cfa: CfaPattern,
    /// The demosaic method used by [`decode`].
    ///
    /// Default is [`DemosaicMethod::Identity`].
    pub demosaic: DemosaicMethod,
    /// How far the 16-bit tone curve output is shifted down to reach 8 bits.
    /// Values that still exceed 255 saturate.
    ///
    /// Default is 4.
    pub output_shift: u8,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            literal: LiteralPrecision::FiveBit,
            cfa: CfaPattern::Rggb,
            demosaic: DemosaicMethod::Identity,
            output_shift: 4,
        }
    }
}

/// A decoded 8-bit gray image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
    /// The pixel data, one byte per pixel, row-major order.
    pub data: Vec<u8>,
}

impl Image {
    /// The `P5` header of the image.
    pub fn ppm_header(&self) -> String {
        ppm::header(self.width, self.height)
    }

    /// The length of the encoded image in bytes, header included.
    pub fn ppm_len(&self) -> usize {
        ppm::encoded_len(self.width, self.height)
    }

    /// Encode the image as a binary PGM.
    pub fn to_ppm(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.ppm_len())
            .map_err(|_| DecodeError::OutOfMemory)?;
        out.extend_from_slice(self.ppm_header().as_bytes());
        out.extend_from_slice(&self.data);

        Ok(out)
    }

    /// Write the image as a binary PGM to `writer`.
    pub fn write_ppm(&self, writer: impl Write) -> io::Result<()> {
        ppm::write(writer, self.width, self.height, &self.data)
    }
}

/// Decode a RADC bitstream using the demosaic method of `settings`.
///
/// `data` is the compressed pixel data without any file container. Both
/// `width` and `height` must be non-zero multiples of 4.
pub fn decode(data: &[u8], width: u32, height: u32, settings: &DecodeSettings) -> Result<Image> {
    decode_with(
        data,
        width,
        height,
        settings,
        ToneCurve::default_curve(),
        &settings.demosaic,
    )
}

/// Decode a RADC bitstream with a custom tone curve and demosaic
/// implementation.
///
/// [`DecodeSettings::demosaic`] is ignored.
pub fn decode_with(
    data: &[u8],
    width: u32,
    height: u32,
    settings: &DecodeSettings,
    curve: &ToneCurve,
    demosaic: &impl Demosaic,
) -> Result<Image> {
    let num_pixels = validate_geometry(width, height)?;

    ldebug!(
        "decoding {width}x{height} image from {} bytes with {settings:?}",
        data.len()
    );

    let samples = decoder::decode_samples(
        data,
        width as usize,
        height as usize,
        settings.literal,
    )?;

    let mut mosaic = try_vec(num_pixels, 0_u8)?;

    for (out, sample) in mosaic.iter_mut().zip(samples) {
        *out = curve.to_display(sample, settings.output_shift);
    }

    let mut pixels = try_vec(num_pixels, 0_u8)?;
    demosaic.demosaic(&mosaic, width, height, settings.cfa, &mut pixels);

    Ok(Image {
        width,
        height,
        data: pixels,
    })
}

/// Decode a RADC bitstream straight into binary PGM bytes.
pub fn decode_to_ppm(
    data: &[u8],
    width: u32,
    height: u32,
    settings: &DecodeSettings,
) -> Result<Vec<u8>> {
    decode(data, width, height, settings)?.to_ppm()
}

/// Check the declared geometry and return the pixel count.
fn validate_geometry(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        bail!(GeometryError::ZeroDimension);
    }

    if !width.is_multiple_of(4) || !height.is_multiple_of(4) {
        bail!(GeometryError::NotMultipleOfFour);
    }

    (width as usize)
        .checked_mul(height as usize)
        .ok_or(GeometryError::TooLarge.into())
}

/// Allocate a vector of `len` copies of `value`, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)
        .map_err(|_| DecodeError::OutOfMemory)?;
    vec.resize(len, value);

    Ok(vec)
}
