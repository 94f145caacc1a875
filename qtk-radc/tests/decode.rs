//! Tests against the public decoding API.

use qtk_radc::container::QtkHeader;
use qtk_radc::demosaic::{BoxSmooth, Identity};
use qtk_radc::{
    CfaPattern, ContainerError, CurveError, DecodeError, DecodeSettings, DemosaicMethod,
    GeometryError, LiteralPrecision, ToneCurve, decode, decode_to_ppm, decode_with, ppm,
};

fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;

    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

#[test]
fn random_stream_is_deterministic() {
    let data = noise(1 << 19, 0x1234_5678);
    let settings = DecodeSettings::default();

    let a = decode(&data, 320, 240, &settings).unwrap();
    let b = decode(&data, 320, 240, &settings).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.data.len(), 320 * 240);
}

#[test]
fn concurrent_decodes_agree() {
    let data = noise(1 << 19, 0xdead_beef);
    let expected = decode(&data, 640, 480, &DecodeSettings::default()).unwrap();

    let handles = (0..4)
        .map(|_| {
            let data = data.clone();
            std::thread::spawn(move || decode(&data, 640, 480, &DecodeSettings::default()))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), expected);
    }
}

#[test]
fn settings_change_the_output() {
    let data = noise(1 << 19, 0x0bad_cafe);
    let base = decode(&data, 320, 240, &DecodeSettings::default()).unwrap();

    let six_bit = DecodeSettings {
        literal: LiteralPrecision::SixBit,
        ..DecodeSettings::default()
    };
    assert_ne!(decode(&data, 320, 240, &six_bit).unwrap(), base);

    let darker = DecodeSettings {
        output_shift: 6,
        ..DecodeSettings::default()
    };
    let darker = decode(&data, 320, 240, &darker).unwrap();
    assert!(darker.data.iter().zip(&base.data).all(|(d, b)| d <= b));
}

#[test]
fn demosaic_settings_match_explicit_implementations() {
    let data = noise(1 << 19, 0x5eed_5eed);

    let settings = DecodeSettings {
        demosaic: DemosaicMethod::BoxSmooth,
        cfa: CfaPattern::Gbrg,
        ..DecodeSettings::default()
    };
    let curve = ToneCurve::default_curve();
    let a = decode(&data, 320, 240, &settings).unwrap();
    let b = decode_with(&data, 320, 240, &settings, curve, &BoxSmooth).unwrap();
    assert_eq!(a, b);

    let identity = decode_with(&data, 320, 240, &settings, curve, &Identity).unwrap();
    let plain = decode(&data, 320, 240, &DecodeSettings::default()).unwrap();
    assert_eq!(identity, plain);
}

#[test]
fn custom_curve_changes_the_output() {
    let data = noise(1 << 19, 0x2468_ace0);
    let settings = DecodeSettings::default();
    let base = decode(&data, 320, 240, &settings).unwrap();

    let dark = ToneCurve::new(&[(0, 0), (65535, 0)]).unwrap();
    let dark = decode_with(&data, 320, 240, &settings, &dark, &Identity).unwrap();
    assert!(dark.data.iter().all(|&v| v == 0));
    assert_ne!(dark, base);

    assert_eq!(
        ToneCurve::new(&[(0, 0), (4095, 4095)]),
        Err(DecodeError::Curve(CurveError::InvalidDomain))
    );
}

#[test]
fn ppm_bytes() {
    let data = noise(1 << 19, 0x0f0f_0f0f);
    let settings = DecodeSettings::default();

    let bytes = decode_to_ppm(&data, 640, 480, &settings).unwrap();
    let header = ppm::header(640, 480);

    assert_eq!(bytes.len(), ppm::encoded_len(640, 480));
    assert!(bytes.starts_with(header.as_bytes()));
    assert_eq!(
        &bytes[header.len()..],
        &decode(&data, 640, 480, &settings).unwrap().data[..]
    );
}

#[test]
fn geometry_is_checked_first() {
    let settings = DecodeSettings::default();

    for (width, height, error) in [
        (0, 0, GeometryError::ZeroDimension),
        (0, 480, GeometryError::ZeroDimension),
        (640, 0, GeometryError::ZeroDimension),
        (641, 480, GeometryError::NotMultipleOfFour),
        (640, 482, GeometryError::NotMultipleOfFour),
        (6, 4, GeometryError::NotMultipleOfFour),
    ] {
        assert_eq!(
            decode(&[], width, height, &settings),
            Err(DecodeError::Geometry(error)),
            "{width}x{height}"
        );
    }
}

#[test]
fn short_input_is_truncated() {
    let data = noise(1 << 10, 0x7777_7777);

    assert_eq!(
        decode(&data, 640, 480, &DecodeSettings::default()),
        Err(DecodeError::Truncated)
    );
    assert_eq!(
        decode(&[], 4, 4, &DecodeSettings::default()),
        Err(DecodeError::Truncated)
    );
}

#[test]
fn container_round_trip() {
    let data = noise(1 << 19, 0x1357_9bdf);

    for (kind, offset) in [(30_u16, 738), (0, 736)] {
        let mut file = vec![0; offset];
        file[..4].copy_from_slice(b"qktn");
        file[544..546].copy_from_slice(&240_u16.to_be_bytes());
        file[546..548].copy_from_slice(&320_u16.to_be_bytes());
        file[552..554].copy_from_slice(&kind.to_be_bytes());
        file.extend_from_slice(&data);

        let header = QtkHeader::parse(&file).unwrap();
        assert_eq!((header.width, header.height), (320, 240));
        assert_eq!(header.data_offset, offset);

        let image = decode(
            header.payload(&file).unwrap(),
            header.width,
            header.height,
            &DecodeSettings::default(),
        )
        .unwrap();
        assert_eq!(
            image,
            decode(&data, 320, 240, &DecodeSettings::default()).unwrap()
        );
    }
}

#[test]
fn container_errors() {
    assert_eq!(
        QtkHeader::parse(b"qktk"),
        Err(DecodeError::Container(ContainerError::Unsupported))
    );
    assert_eq!(
        QtkHeader::parse(b"qktn"),
        Err(DecodeError::Container(ContainerError::TooShort))
    );
    assert_eq!(
        QtkHeader::parse(&[0; 800]),
        Err(DecodeError::Container(ContainerError::InvalidSignature))
    );
}

#[test]
fn errors_display() {
    assert_eq!(DecodeError::Truncated.to_string(), "unexpected end of bitstream");
    assert_eq!(
        DecodeError::from(GeometryError::NotMultipleOfFour).to_string(),
        "image width and height must be multiples of 4"
    );
}
