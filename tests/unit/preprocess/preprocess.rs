use super::*;

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 17) as u8, (y * 29) as u8, ((x + y) * 7) as u8, 200]);
        }
    }
    PixelBuffer::new(w, h, data).unwrap()
}

#[test]
fn neutral_params_are_byte_identical() {
    let src = gradient(9, 6);
    let params = PreprocessParams::default();
    assert!(params.is_neutral());
    let out = preprocess(&src, &params, 42).unwrap();
    assert_eq!(out, src);
}

#[test]
fn grain_is_seeded_bounded_and_keeps_alpha() {
    let src = PixelBuffer::filled(16, 16, [128, 128, 128, 77]).unwrap();
    let params = PreprocessParams {
        grain: 0.5,
        ..Default::default()
    };
    let a = preprocess(&src, &params, 1).unwrap();
    let b = preprocess(&src, &params, 1).unwrap();
    let c = preprocess(&src, &params, 2).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    let half = 0.5 * 255.0 / 2.0;
    for px in a.data().chunks_exact(4) {
        assert_eq!(px[3], 77);
        for &ch in &px[..3] {
            assert!((f32::from(ch) - 128.0).abs() <= half + 1.0);
        }
    }
    // Channels receive independent noise.
    assert!(a.data().chunks_exact(4).any(|px| px[0] != px[1]));
}

#[test]
fn gamma_brightens_midtones() {
    let src = PixelBuffer::filled(2, 2, [64, 128, 255, 255]).unwrap();
    let out = preprocess(
        &src,
        &PreprocessParams {
            gamma: 2.0,
            ..Default::default()
        },
        0,
    )
    .unwrap();
    let px = out.pixel(0, 0);
    assert_eq!(px[0], (255.0f32 * (64.0f32 / 255.0).powf(0.5)).round() as u8);
    assert!(px[1] > 128);
    assert_eq!(px[2], 255);
}

#[test]
fn levels_stretch_and_handle_equal_points() {
    let src = PixelBuffer::filled(1, 1, [50, 100, 150, 255]).unwrap();
    let out = preprocess(
        &src,
        &PreprocessParams {
            black_point: 50,
            white_point: 150,
            ..Default::default()
        },
        0,
    )
    .unwrap();
    assert_eq!(out.pixel(0, 0), [0, 128, 255, 255]);

    let flat = preprocess(
        &src,
        &PreprocessParams {
            black_point: 100,
            white_point: 100,
            ..Default::default()
        },
        0,
    )
    .unwrap();
    assert_eq!(flat.pixel(0, 0), [0, 0, 255, 255]);
}

#[test]
fn source_is_never_mutated() {
    let src = gradient(5, 5);
    let before = src.clone();
    let _ = preprocess(
        &src,
        &PreprocessParams {
            blur: 2,
            grain: 0.3,
            gamma: 0.7,
            black_point: 10,
            white_point: 240,
        },
        3,
    )
    .unwrap();
    assert_eq!(src, before);
}

#[test]
fn sanitized_clamps_bad_values() {
    let p = PreprocessParams {
        grain: 4.0,
        gamma: -1.0,
        ..Default::default()
    }
    .sanitized();
    assert_eq!(p.grain, 1.0);
    assert_eq!(p.gamma, MIN_GAMMA);
    let p = PreprocessParams {
        gamma: f32::NAN,
        ..Default::default()
    }
    .sanitized();
    assert_eq!(p.gamma, 1.0);
}
