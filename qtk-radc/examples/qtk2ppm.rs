//! This example converts a QuickTake 150 `.qtk` file into a binary PGM.
//!
//! Usage: `cargo run --example qtk2ppm --features logging -- in.qtk out.ppm`

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use qtk_radc::container::QtkHeader;
use qtk_radc::{DecodeSettings, decode};

fn main() -> Result<(), Box<dyn Error>> {
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("image.qtk"));
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension("ppm"));

    let file = std::fs::read(&input)?;
    let header = QtkHeader::parse(&file)?;
    eprintln!(
        "Size: {}x{}, type: {}",
        header.width, header.height, header.kind
    );

    let image = decode(
        header.payload(&file)?,
        header.width,
        header.height,
        &DecodeSettings::default(),
    )?;

    image.write_ppm(BufWriter::new(File::create(&output)?))?;
    Ok(())
}

static LOGGER: SimpleLogger = SimpleLogger;

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::LevelFilter::Debug
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}
