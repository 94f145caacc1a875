//! The `.qtk` file container.
//!
//! A QuickTake file starts with a four-byte signature followed by a fixed
//! header. Only the geometry and the start of the compressed pixel data are
//! of interest here; everything else (thumbnail, camera settings) is skipped.
//!
//! [`decode`](crate::decode) operates on the bare pixel data and never looks
//! at the container, so callers that already know the geometry can bypass
//! this module entirely.

use crate::error::{ContainerError, Result, bail};

/// The signature of a QuickTake 150 file.
pub const QUICKTAKE_150: &[u8; 4] = b"qktn";
/// The signature of a QuickTake 100 file, which uses a different codec.
pub const QUICKTAKE_100: &[u8; 4] = b"qktk";

const HEIGHT_OFFSET: usize = 544;
const WIDTH_OFFSET: usize = 546;
const KIND_OFFSET: usize = 552;

/// The header kind whose pixel data starts two bytes later.
const LONG_HEADER_KIND: u16 = 30;
const LONG_HEADER_LEN: usize = 738;
const SHORT_HEADER_LEN: usize = 736;

/// The parsed header of a QuickTake 150 file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtkHeader {
    /// The image width in pixels.
    pub width: u32,
    /// The image height in pixels.
    pub height: u32,
    /// The header kind, which determines the data offset.
    pub kind: u16,
    /// The byte offset of the compressed pixel data.
    pub data_offset: usize,
}

impl QtkHeader {
    /// Parse the header at the start of `file`.
    pub fn parse(file: &[u8]) -> Result<Self> {
        let signature = file.get(..4).ok_or(ContainerError::TooShort)?;

        if signature == QUICKTAKE_100 {
            bail!(ContainerError::Unsupported);
        }

        if signature != QUICKTAKE_150 {
            bail!(ContainerError::InvalidSignature);
        }

        let height = read_u16(file, HEIGHT_OFFSET)?;
        let width = read_u16(file, WIDTH_OFFSET)?;
        let kind = read_u16(file, KIND_OFFSET)?;

        let data_offset = if kind == LONG_HEADER_KIND {
            LONG_HEADER_LEN
        } else {
            SHORT_HEADER_LEN
        };

        Ok(Self {
            width: width as u32,
            height: height as u32,
            kind,
            data_offset,
        })
    }

    /// The compressed pixel data of `file`.
    pub fn payload<'a>(&self, file: &'a [u8]) -> Result<&'a [u8]> {
        file.get(self.data_offset..)
            .ok_or(ContainerError::TooShort.into())
    }
}

fn read_u16(file: &[u8], offset: usize) -> Result<u16> {
    let bytes = file
        .get(offset..offset + 2)
        .ok_or(ContainerError::TooShort)?;

    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}
