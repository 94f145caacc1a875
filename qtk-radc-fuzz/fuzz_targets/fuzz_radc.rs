#![no_main]

use libfuzzer_sys::fuzz_target;
use qtk_radc::{CfaPattern, DecodeSettings, DemosaicMethod, LiteralPrecision};

// Header layout (4 bytes):
// [0]     width / 4, at least 1
// [1]     height / 4, at least 1
// [2]     bit 0: literal precision, bits 1-2: demosaic, bits 3-4: CFA pattern
// [3]     output shift
// [4..]   RADC encoded data

const HEADER_SIZE: usize = 4;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let width = data[0].max(1) as u32 * 4;
    let height = data[1].max(1) as u32 * 4;
    let flags = data[2];

    let settings = DecodeSettings {
        literal: if flags & 1 == 0 {
            LiteralPrecision::FiveBit
        } else {
            LiteralPrecision::SixBit
        },
        demosaic: match (flags >> 1) & 3 {
            0 => DemosaicMethod::Identity,
            1 => DemosaicMethod::BoxSmooth,
            _ => DemosaicMethod::Bilinear,
        },
        cfa: match (flags >> 3) & 3 {
            0 => CfaPattern::Rggb,
            1 => CfaPattern::Bggr,
            2 => CfaPattern::Grbg,
            _ => CfaPattern::Gbrg,
        },
        output_shift: data[3],
    };

    let _ = qtk_radc::decode_to_ppm(&data[HEADER_SIZE..], width, height, &settings);
});
