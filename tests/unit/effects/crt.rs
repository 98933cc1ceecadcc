use super::*;

fn noise(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::new();
    for i in 0..(w * h) {
        let v = (i.wrapping_mul(2_654_435_761) >> 13) as u8;
        data.extend_from_slice(&[v, v.wrapping_mul(3), v.wrapping_add(91), 255]);
    }
    PixelBuffer::new(w, h, data).unwrap()
}

#[test]
fn barrel_source_stays_in_bounds_for_extreme_distortion() {
    for distortion in [-10.0, -1.0, 0.0, 1.0, 10.0, f32::NAN] {
        for y in 0..12 {
            for x in 0..9 {
                let (sx, sy) = barrel_source(x, y, 9, 12, distortion);
                assert!((0..9).contains(&sx) && (0..12).contains(&sy));
            }
        }
    }
}

#[test]
fn zero_distortion_maps_to_self() {
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(barrel_source(x, y, 8, 8, 0.0), (i64::from(x), i64::from(y)));
        }
    }
}

#[test]
fn extreme_offsets_render_without_panicking() {
    let src = noise(13, 7);
    for kind in [TubeKind::Monitor, TubeKind::Tv, TubeKind::Lcd] {
        for off in [-10.0, 10.0, 1e9, f32::INFINITY] {
            let params = CrtParams {
                kind,
                distortion: 10.0,
                red_offset_x: off,
                red_offset_y: -off,
                blue_offset_x: -off,
                blue_offset_y: off,
                bloom_threshold: 255.0,
                bloom_intensity: 2.0,
                glow_intensity: 2.0,
                ..Default::default()
            };
            let out = render_crt(&src, &params).unwrap();
            assert_eq!((out.width(), out.height()), (13, 7));
            assert!(out.data().chunks_exact(4).all(|px| px[3] == 255));
        }
    }
}

#[test]
fn tv_scanlines_darken_pitch_rows() {
    let src = PixelBuffer::filled(6, 6, [200, 200, 200, 255]).unwrap();
    let params = CrtParams {
        kind: TubeKind::Tv,
        distortion: 0.0,
        dot_pitch: 3.0,
        falloff: 0.5,
        glow_intensity: 0.0,
        bloom_intensity: 0.0,
        ..Default::default()
    };
    let out = render_crt(&src, &params).unwrap();
    assert_eq!(out.pixel(2, 0)[1], 100);
    assert_eq!(out.pixel(2, 1)[1], 200);
    assert_eq!(out.pixel(2, 3)[1], 100);
}

#[test]
fn monitor_mask_dims_two_channels() {
    let src = PixelBuffer::filled(6, 2, [100, 100, 100, 255]).unwrap();
    let params = CrtParams {
        distortion: 0.0,
        falloff: 1.0,
        glow_intensity: 0.0,
        bloom_intensity: 0.0,
        ..Default::default()
    };
    let out = render_crt(&src, &params).unwrap();
    assert_eq!(out.pixel(0, 1), [100, 70, 70, 255]);
    assert_eq!(out.pixel(1, 1), [70, 100, 70, 255]);
    assert_eq!(out.pixel(2, 1), [70, 70, 100, 255]);
}
