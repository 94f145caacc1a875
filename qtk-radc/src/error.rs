//! Error types for RADC decoding.

use core::fmt;

/// The main error type for QuickTake decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The bitstream ended before the declared geometry was decoded.
    Truncated,
    /// A plane, buffer or output allocation failed.
    OutOfMemory,
    /// Errors related to the declared image geometry.
    Geometry(GeometryError),
    /// Errors related to Huffman decoding.
    Huffman(HuffmanError),
    /// Errors related to tone curve construction.
    Curve(CurveError),
    /// Errors related to the `.qtk` file container.
    Container(ContainerError),
}

/// Errors related to the declared image geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Width or height is zero.
    ZeroDimension,
    /// Width or height is not a multiple of 4.
    NotMultipleOfFour,
    /// The pixel count does not fit into memory.
    TooLarge,
}

/// Errors related to Huffman decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    /// No code of at most 8 bits matched the input.
    InvalidCode,
}

/// Errors related to tone curve construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Fewer than two breakpoints were given.
    TooFewPoints,
    /// The breakpoints do not span the full 16-bit domain.
    InvalidDomain,
    /// Breakpoint x coordinates are not strictly increasing.
    NotIncreasing,
}

/// Errors related to the `.qtk` file container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    /// The file does not start with a QuickTake signature.
    InvalidSignature,
    /// The file is a QuickTake variant this crate cannot decode.
    Unsupported,
    /// The file is shorter than its header.
    TooShort,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of bitstream"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::Geometry(e) => write!(f, "{e}"),
            Self::Huffman(e) => write!(f, "{e}"),
            Self::Curve(e) => write!(f, "{e}"),
            Self::Container(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "image width and height must be non-zero"),
            Self::NotMultipleOfFour => {
                write!(f, "image width and height must be multiples of 4")
            }
            Self::TooLarge => write!(f, "image dimensions are too large"),
        }
    }
}

impl fmt::Display for HuffmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCode => write!(f, "invalid Huffman code"),
        }
    }
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints => write!(f, "tone curve needs at least two breakpoints"),
            Self::InvalidDomain => write!(f, "tone curve must span 0 to 65535"),
            Self::NotIncreasing => write!(f, "tone curve breakpoints must be strictly increasing"),
        }
    }
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "not a QuickTake file"),
            Self::Unsupported => write!(f, "unsupported QuickTake variant"),
            Self::TooShort => write!(f, "QuickTake header is truncated"),
        }
    }
}

impl core::error::Error for DecodeError {}
impl core::error::Error for GeometryError {}
impl core::error::Error for HuffmanError {}
impl core::error::Error for CurveError {}
impl core::error::Error for ContainerError {}

impl From<GeometryError> for DecodeError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<HuffmanError> for DecodeError {
    fn from(e: HuffmanError) -> Self {
        Self::Huffman(e)
    }
}

impl From<CurveError> for DecodeError {
    fn from(e: CurveError) -> Self {
        Self::Curve(e)
    }
}

impl From<ContainerError> for DecodeError {
    fn from(e: ContainerError) -> Self {
        Self::Container(e)
    }
}

/// Result type for QuickTake decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;
