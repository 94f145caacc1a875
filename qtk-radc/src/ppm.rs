//! Binary PGM (`P5`) serialization.

use std::io::{self, Write};

/// The `P5` header for a `width`×`height` 8-bit gray image.
pub fn header(width: u32, height: u32) -> String {
    format!("P5\n#test\n{width} {height}\n255\n")
}

/// The total length in bytes of the encoded image, header included.
pub fn encoded_len(width: u32, height: u32) -> usize {
    header(width, height).len() + width as usize * height as usize
}

/// Write the header followed by `data`.
pub(crate) fn write(mut writer: impl Write, width: u32, height: u32, data: &[u8]) -> io::Result<()> {
    writer.write_all(header(width, height).as_bytes())?;
    writer.write_all(data)?;
    writer.flush()
}
