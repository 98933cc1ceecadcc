use super::*;

fn numbered(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
        }
    }
    PixelBuffer::new(w, h, data).unwrap()
}

#[test]
fn nearest_clamps_every_coordinate() {
    let buf = numbered(4, 3);
    let s = Sampler::new(&buf);
    assert_eq!(s.nearest(-10.0, -10.0), [0, 0, 0, 255]);
    assert_eq!(s.nearest(100.0, 100.0), [3, 2, 0, 255]);
    assert_eq!(s.nearest(f32::NAN, f32::INFINITY), [0, 0, 0, 255]);
    assert_eq!(s.nearest(2.9, 1.2), [2, 1, 0, 255]);
    assert_eq!(s.at(-1, 7), [0, 2, 0, 255]);
}

#[test]
fn identity_resample_is_a_copy() {
    let buf = numbered(5, 4);
    let out = resample(&buf, Canvas::of(&buf), &SourceTransform::default()).unwrap();
    assert_eq!(out, buf);
}

#[test]
fn offset_shifts_content() {
    let buf = numbered(10, 10);
    let t = SourceTransform {
        offset_x_pct: 20.0,
        ..Default::default()
    };
    let out = resample(&buf, Canvas::of(&buf), &t).unwrap();
    // Content moves right by two pixels; left edge clamps to column 0.
    assert_eq!(out.pixel(5, 0)[0], 3);
    assert_eq!(out.pixel(0, 0)[0], 0);
}

#[test]
fn zoom_magnifies_around_center() {
    let buf = numbered(8, 8);
    let t = SourceTransform {
        scale_pct: 200.0,
        ..Default::default()
    };
    let out = resample(&buf, Canvas::of(&buf), &t).unwrap();
    assert_eq!(out.pixel(0, 0)[0], 2);
    assert_eq!(out.pixel(7, 7)[0], 5);
}

#[test]
fn resample_to_different_canvas_has_canvas_size() {
    let buf = numbered(4, 4);
    let out = resample(
        &buf,
        Canvas {
            width: 6,
            height: 2,
        },
        &SourceTransform::default(),
    )
    .unwrap();
    assert_eq!((out.width(), out.height()), (6, 2));
}
