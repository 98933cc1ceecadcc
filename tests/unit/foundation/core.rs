use super::*;

#[test]
fn pixel_buffer_rejects_zero_size_and_length_mismatch() {
    assert!(PixelBuffer::new(0, 4, Vec::new()).is_err());
    assert!(PixelBuffer::new(2, 2, vec![0u8; 15]).is_err());
    assert!(PixelBuffer::new(2, 2, vec![0u8; 16]).is_ok());
}

#[test]
fn filled_and_fill_rect_clip_to_bounds() {
    let mut buf = PixelBuffer::filled(3, 2, [1, 2, 3, 255]).unwrap();
    assert_eq!(buf.data().len(), 3 * 2 * 4);
    buf.fill_rect(2, 1, 10, 10, [9, 9, 9, 255]);
    assert_eq!(buf.pixel(2, 1), [9, 9, 9, 255]);
    assert_eq!(buf.pixel(1, 1), [1, 2, 3, 255]);
    assert_eq!(buf.pixel(2, 0), [1, 2, 3, 255]);
}

#[test]
fn hex_colors_parse_and_roundtrip() {
    assert_eq!(Rgb::from_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
    assert_eq!(Rgb::from_hex("0a0B0c").unwrap(), Rgb::new(10, 11, 12));
    assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
    assert!(Rgb::from_hex("#12345").is_err());
    assert!(Rgb::from_hex("#gg0000").is_err());
    assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
}

#[test]
fn rgb_serde_uses_hex_strings() {
    let c: Rgb = serde_json::from_str("\"#102030\"").unwrap();
    assert_eq!(c, Rgb::new(16, 32, 48));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#102030\"");
    assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
}

#[test]
fn lerp_hits_endpoints_and_clamps_t() {
    let a = Rgb::new(0, 100, 200);
    let b = Rgb::new(200, 100, 0);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 5.0), b);
    assert_eq!(a.lerp(b, f32::NAN), a);
    assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
}

#[test]
fn frame_info_time_from_fps() {
    let f = FrameInfo::at(30, 30.0);
    assert_eq!(f.index, 30);
    assert!((f.time_s - 1.0).abs() < 1e-12);
    assert_eq!(FrameInfo::at(5, 0.0).time_s, 0.0);
}

#[test]
fn luma_plane_matches_rec601_and_clamps_reads() {
    let buf = PixelBuffer::new(2, 1, vec![255, 255, 255, 255, 255, 0, 0, 255]).unwrap();
    let plane = Plane::luma_of(&buf);
    assert!((plane.get(0, 0) - 255.0).abs() < 1e-3);
    assert!((plane.get(1, 0) - 0.299 * 255.0).abs() < 1e-3);
    assert_eq!(plane.at_clamped(-4.0, 9.0), plane.get(0, 0));
    assert_eq!(plane.at_clamped(7.5, 0.0), plane.get(1, 0));
    assert_eq!(plane.at_clamped(f64::NAN, 0.0), plane.get(0, 0));
    assert!(Plane::zeros(0, 1).is_err());
}
