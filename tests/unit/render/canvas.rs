use super::*;

#[test]
fn empty_canvas_is_opaque_background() {
    let bg = Rgb::new(12, 200, 99);
    let out = ShapeCanvas::new(7, 5, bg).unwrap().finish().unwrap();
    assert_eq!((out.width(), out.height()), (7, 5));
    assert!(out.data().chunks_exact(4).all(|px| px == bg.to_rgba()));
}

#[test]
fn marks_cover_their_centers() {
    let mut c = ShapeCanvas::new(30, 10, Rgb::WHITE).unwrap();
    c.set_color(Rgb::BLACK, 255);
    c.mark(Mark::Dot, 5.0, 5.0, 6.0);
    c.mark(Mark::Square, 15.0, 5.0, 6.0);
    c.mark(Mark::Rounded(2.0), 25.0, 5.0, 6.0);
    let out = c.finish().unwrap();
    for x in [5, 15, 25] {
        assert_eq!(out.pixel(x, 5), [0, 0, 0, 255]);
    }
    assert_eq!(out.pixel(10, 5), [255, 255, 255, 255]);
    assert_eq!(out.pixel(5, 0), [255, 255, 255, 255]);
}

#[test]
fn degenerate_sizes_draw_nothing() {
    let mut c = ShapeCanvas::new(8, 8, Rgb::WHITE).unwrap();
    c.set_color(Rgb::BLACK, 255);
    c.mark(Mark::Dot, 4.0, 4.0, 0.0);
    c.mark(Mark::Square, 4.0, 4.0, f64::NAN);
    c.ellipse(4.0, 4.0, 3.0, -1.0);
    c.ellipse(4.0, 4.0, 0.0, 2.0);
    let out = c.finish().unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn translucent_fill_blends_over_background() {
    let mut c = ShapeCanvas::new(4, 4, Rgb::WHITE).unwrap();
    c.set_color(Rgb::BLACK, 128);
    c.mark(Mark::Square, 2.0, 2.0, 4.0);
    let px = c.finish().unwrap().pixel(1, 1);
    assert!((120..=135).contains(&px[0]), "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn oversized_canvas_is_rejected() {
    assert!(ShapeCanvas::new(70_000, 4, Rgb::WHITE).is_err());
    assert!(ShapeCanvas::new(0, 4, Rgb::WHITE).is_err());
}
