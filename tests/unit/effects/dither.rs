use super::*;

fn gray(w: u32, h: u32, v: u8) -> PixelBuffer {
    PixelBuffer::filled(w, h, [v, v, v, 255]).unwrap()
}

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 255 / w) as u8, (y * 255 / h) as u8, 90, 255]);
        }
    }
    PixelBuffer::new(w, h, data).unwrap()
}

#[test]
fn floyd_steinberg_conserves_brightness_on_constant_gray() {
    let (w, h) = (64usize, 64usize);
    let mut plane = vec![100.0f32; w * h];
    floyd_steinberg(&mut plane, w, h, 128.0, 1.0);
    let white = plane.iter().filter(|&&v| v == 255.0).count() as f64;
    let ratio = white / (w * h) as f64;
    assert!((ratio - 100.0 / 255.0).abs() < 0.02, "white ratio {ratio}");
    assert!(plane.iter().all(|&v| v == 0.0 || v == 255.0));
}

#[test]
fn zero_strength_is_plain_threshold() {
    let mut plane = vec![100.0, 200.0, 128.0, 129.0];
    floyd_steinberg(&mut plane, 2, 2, 128.0, 0.0);
    assert_eq!(plane, vec![0.0, 255.0, 0.0, 255.0]);
}

#[test]
fn bayer_thresholds_follow_matrix() {
    assert_eq!(bayer_threshold(0, 0), 0.0);
    assert_eq!(bayer_threshold(1, 0), 8.0 / 16.0 * 255.0);
    assert_eq!(bayer_threshold(4, 4), bayer_threshold(0, 0));
}

#[test]
fn bw_output_is_bg_or_fg_only() {
    let src = gradient(32, 24);
    let bg = Rgb::new(240, 230, 200);
    let fg = Rgb::new(20, 30, 90);
    for pattern in [
        DitherPattern::FloydSteinberg,
        DitherPattern::Bayer4x4,
        DitherPattern::Random,
    ] {
        let params = DitherParams {
            pattern,
            bg,
            fg,
            ..Default::default()
        };
        let out = render_dither(&src, &params, 7).unwrap();
        for px in out.data().chunks_exact(4) {
            let c = Rgb::new(px[0], px[1], px[2]);
            assert!(c == bg || c == fg, "{pattern:?} produced {c:?}");
            assert_eq!(px[3], 255);
        }
    }
}

#[test]
fn full_color_output_stays_in_palette() {
    let src = gradient(40, 30);
    for count in [2, 3, 8, 9, 27, 64] {
        for pattern in [
            DitherPattern::FloydSteinberg,
            DitherPattern::Bayer4x4,
            DitherPattern::Random,
        ] {
            let params = DitherParams {
                pattern,
                color_mode: ColorMode::FullColor,
                color_count: count,
                distance: DistanceMetric::Redmean,
                strength: 2.5,
                ..Default::default()
            };
            let palette = params.output_palette();
            let out = render_dither(&src, &params, 1).unwrap();
            for px in out.data().chunks_exact(4) {
                assert!(palette.contains(Rgb::new(px[0], px[1], px[2])));
            }
        }
    }
}

#[test]
fn halftone_channels_are_binary() {
    let out = render_dither(
        &gradient(16, 16),
        &DitherParams {
            color_mode: ColorMode::Halftone,
            ..Default::default()
        },
        3,
    )
    .unwrap();
    assert!(out.data().iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn pixel_step_fills_whole_blocks() {
    let params = DitherParams {
        pattern: DitherPattern::Bayer4x4,
        pixel_step: 4,
        ..Default::default()
    };
    let out = render_dither(&gradient(10, 10), &params, 0).unwrap();
    for by in (0..10).step_by(4) {
        for bx in (0..10).step_by(4) {
            let first = out.pixel(bx, by);
            for y in by..(by + 4).min(10) {
                for x in bx..(bx + 4).min(10) {
                    assert_eq!(out.pixel(x, y), first);
                }
            }
        }
    }
}

#[test]
fn random_pattern_is_deterministic_per_seed() {
    let src = gray(20, 20, 128);
    let params = DitherParams {
        pattern: DitherPattern::Random,
        ..Default::default()
    };
    let a = render_dither(&src, &params, 11).unwrap();
    let b = render_dither(&src, &params, 11).unwrap();
    let c = render_dither(&src, &params, 12).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn out_of_domain_params_are_clamped() {
    let p = DitherParams {
        color_count: 0,
        strength: f32::NAN,
        threshold: 900.0,
        pixel_step: 0,
        ..Default::default()
    }
    .sanitized();
    assert_eq!(p.color_count, 2);
    assert_eq!(p.strength, 1.0);
    assert_eq!(p.threshold, 255.0);
    assert_eq!(p.pixel_step, 1);
}
