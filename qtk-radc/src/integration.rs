//! Integration with the [image] crate

use std::ffi::OsStr;
use std::io::{BufRead, Seek};

use crate::container::{QUICKTAKE_150, QtkHeader};
use crate::{DecodeError, DecodeSettings, Image};
use ::image::error::{DecodingError, ImageFormatHint, ParameterError, ParameterErrorKind};
use ::image::hooks::{decoding_hook_registered, register_format_detection_hook};
use ::image::{ColorType, ImageDecoder, ImageError, ImageResult};

impl ImageDecoder for Image {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn color_type(&self) -> ColorType {
        ColorType::L8
    }

    fn read_image(self, buf: &mut [u8]) -> ImageResult<()>
    where
        Self: Sized,
    {
        copy_pixels(&self, buf)
    }

    fn read_image_boxed(self: Box<Self>, buf: &mut [u8]) -> ImageResult<()> {
        copy_pixels(&self, buf)
    }
}

fn copy_pixels(image: &Image, buf: &mut [u8]) -> ImageResult<()> {
    if buf.len() != image.data.len() {
        return Err(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        )));
    }

    buf.copy_from_slice(&image.data);
    Ok(())
}

/// QuickTake 150 decoder compatible with `image` decoding hook APIs that pass
/// an `impl Read + Seek`.
///
/// The whole file is buffered; only the header is parsed up front.
pub struct QtkDecoder {
    input: Vec<u8>,
    header: QtkHeader,
    settings: DecodeSettings,
}

impl QtkDecoder {
    /// Create a new decoder that decodes from the stream `r`.
    pub fn new<R: BufRead + Seek>(r: R) -> ImageResult<Self> {
        Self::with_settings(r, DecodeSettings::default())
    }

    /// Create a new decoder with custom decode settings.
    pub fn with_settings<R: BufRead + Seek>(mut r: R, settings: DecodeSettings) -> ImageResult<Self> {
        let mut input = Vec::new();
        r.read_to_end(&mut input)?;
        let header = QtkHeader::parse(&input)?;

        Ok(Self {
            input,
            header,
            settings,
        })
    }

    fn decode(&self) -> ImageResult<Image> {
        let payload = self.header.payload(&self.input)?;

        Ok(crate::decode(
            payload,
            self.header.width,
            self.header.height,
            &self.settings,
        )?)
    }
}

impl ImageDecoder for QtkDecoder {
    fn dimensions(&self) -> (u32, u32) {
        (self.header.width, self.header.height)
    }

    fn color_type(&self) -> ColorType {
        ColorType::L8
    }

    fn read_image(self, buf: &mut [u8]) -> ImageResult<()>
    where
        Self: Sized,
    {
        self.decode()?.read_image(buf)
    }

    fn read_image_boxed(self: Box<Self>, buf: &mut [u8]) -> ImageResult<()> {
        self.decode()?.read_image(buf)
    }
}

impl From<DecodeError> for DecodingError {
    fn from(value: DecodeError) -> Self {
        let format = ImageFormatHint::Name("QuickTake".to_owned());
        Self::new(format, value)
    }
}

impl From<DecodeError> for ImageError {
    fn from(value: DecodeError) -> Self {
        Self::Decoding(value.into())
    }
}

/// Registers the decoder with the `image` crate so that non-format-specific
/// calls such as `ImageReader::open("image.qtk")?.decode()?;` work with
/// QuickTake 150 files.
///
/// Returns `true` on success, or `false` if the hook is already registered.
pub fn register_decoding_hook() -> bool {
    if decoding_hook_registered(OsStr::new("qtk")) {
        return false;
    }

    ::image::hooks::register_decoding_hook(
        "qtk".into(),
        Box::new(|r| Ok(Box::new(QtkDecoder::new(r)?))),
    );
    register_format_detection_hook("qtk".into(), QUICKTAKE_150, None);

    true
}
