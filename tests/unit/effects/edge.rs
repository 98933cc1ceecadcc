use super::*;

fn split_plane(w: u32, h: u32, split: u32) -> Plane {
    let mut data = Vec::new();
    for _ in 0..h {
        for x in 0..w {
            let v = if x < split { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Plane::luma_of(&PixelBuffer::new(w, h, data).unwrap())
}

#[test]
fn sobel_flat_is_zero_and_border_is_zero() {
    let flat = Plane::luma_of(&PixelBuffer::filled(6, 6, [90, 90, 90, 255]).unwrap());
    assert!(sobel(&flat).unwrap().values().iter().all(|&v| v.abs() < 1e-3));

    let edges = sobel(&split_plane(8, 6, 4)).unwrap();
    assert_eq!(edges.get(0, 3), 0.0);
    assert_eq!(edges.get(7, 3), 0.0);
    assert_eq!(edges.get(4, 0), 0.0);
    // A hard step saturates the magnitude.
    assert_eq!(edges.get(4, 3), 255.0);
    assert!(edges.get(1, 3) < 1e-3);
}

#[test]
fn dots_only_follow_edges() {
    let edges = sobel(&split_plane(16, 16, 6)).unwrap();
    let params = EdgeParams {
        step_size: 4,
        threshold: 128.0,
        min_dot_size: 3.0,
        max_dot_size: 3.0,
        ..Default::default()
    };
    let out = render_edge(&edges, &params).unwrap();
    // Cell centers at x = 2, 6, 10, 14; only the cell at 6 straddles the step between 5 and 6.
    assert_eq!(out.pixel(6, 6), Rgb::BLACK.to_rgba());
    assert_eq!(out.pixel(2, 6), Rgb::WHITE.to_rgba());
    assert_eq!(out.pixel(14, 6), Rgb::WHITE.to_rgba());
}

#[test]
fn zero_threshold_draws_nothing() {
    let edges = sobel(&split_plane(12, 12, 6)).unwrap();
    let params = EdgeParams {
        threshold: 0.0,
        ..Default::default()
    };
    let out = render_edge(&edges, &params).unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px == Rgb::WHITE.to_rgba()));
}

#[test]
fn swapped_dot_sizes_are_reordered() {
    let p = EdgeParams {
        min_dot_size: 20.0,
        max_dot_size: 4.0,
        step_size: 0,
        ..Default::default()
    }
    .sanitized();
    assert_eq!((p.min_dot_size, p.max_dot_size), (4.0, 20.0));
    assert_eq!(p.step_size, 2);
}
