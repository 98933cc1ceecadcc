use super::*;

#[test]
fn two_colors_is_exactly_bg_and_fg() {
    let bg = Rgb::new(250, 240, 230);
    let fg = Rgb::new(10, 20, 30);
    let p = Palette::generate(2, bg, fg);
    assert_eq!(p.colors(), &[bg, fg]);
    // Out-of-domain counts clamp to the two-color case.
    assert_eq!(Palette::generate(0, bg, fg).colors(), &[bg, fg]);
}

#[test]
fn cube_palette_is_truncated_in_rgb_order() {
    let p = Palette::generate(4, Rgb::WHITE, Rgb::BLACK);
    assert_eq!(
        p.colors(),
        &[
            Rgb::new(0, 0, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 255, 255),
        ]
    );

    let p = Palette::generate(27, Rgb::WHITE, Rgb::BLACK);
    assert_eq!(p.len(), 27);
    assert_eq!(p.colors()[1], Rgb::new(0, 0, 128));
    assert_eq!(p.colors()[26], Rgb::new(255, 255, 255));
}

#[test]
fn cube_steps_handles_exact_cubes() {
    assert_eq!(cube_steps(8), 2);
    assert_eq!(cube_steps(9), 3);
    assert_eq!(cube_steps(27), 3);
    assert_eq!(cube_steps(64), 4);
    assert_eq!(cube_steps(65), 5);
}

#[test]
fn nearest_prefers_first_on_ties() {
    let p = Palette::from_colors(vec![Rgb::new(0, 0, 0), Rgb::new(100, 0, 0)]).unwrap();
    for m in [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Redmean,
    ] {
        assert_eq!(p.nearest([50.0, 0.0, 0.0], m), Rgb::new(0, 0, 0));
        assert_eq!(p.nearest([90.0, 0.0, 0.0], m), Rgb::new(100, 0, 0));
    }
}

#[test]
fn metrics_can_disagree() {
    // Manhattan ties on equal channel sums while Euclidean prefers the balanced entry.
    let p = Palette::from_colors(vec![Rgb::new(60, 0, 0), Rgb::new(30, 30, 0)]).unwrap();
    assert_eq!(
        p.nearest([0.0, 0.0, 0.0], DistanceMetric::Manhattan),
        Rgb::new(60, 0, 0)
    );
    assert_eq!(
        p.nearest([0.0, 0.0, 0.0], DistanceMetric::Euclidean),
        Rgb::new(30, 30, 0)
    );
}

#[test]
fn metric_index_clamps() {
    assert_eq!(DistanceMetric::from_index(-3.0), DistanceMetric::Euclidean);
    assert_eq!(DistanceMetric::from_index(1.2), DistanceMetric::Manhattan);
    assert_eq!(DistanceMetric::from_index(9.0), DistanceMetric::Redmean);
    assert!(Palette::from_colors(vec![Rgb::BLACK]).is_none());
}
