use super::*;

#[test]
fn every_kind_has_defaults_that_round_trip_their_name() {
    for kind in EffectParams::KINDS {
        let params = EffectParams::defaults_for(kind).unwrap();
        assert_eq!(params.kind(), *kind);
    }
}

#[test]
fn kind_lookup_accepts_display_names() {
    assert_eq!(EffectParams::defaults_for(" ASCII ").unwrap().kind(), "glyph");
    assert_eq!(
        EffectParams::defaults_for("cellular-automata").unwrap().kind(),
        "automaton"
    );
    let EffectParams::Halftone(p) = EffectParams::defaults_for("stippling").unwrap() else {
        panic!("stippling should map to halftone");
    };
    assert_eq!(p.style, halftone::HalftoneStyle::Stipple);
}

#[test]
fn unknown_and_empty_kinds_are_validation_errors() {
    let err = EffectParams::defaults_for("sparkle").unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    assert!(EffectParams::defaults_for("  ").is_err());
}

#[test]
fn tagged_json_fills_missing_fields_with_defaults() {
    let params: EffectParams = serde_json::from_str(r#"{"kind":"edge","step_size":6}"#).unwrap();
    let EffectParams::Edge(edge) = &params else {
        panic!("expected edge params");
    };
    assert_eq!(edge.step_size, 6);
    assert_eq!(edge.threshold, 128.0);

    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json["kind"], "edge");
    assert_eq!(json["bg"], "#ffffff");
}

#[test]
fn animatable_delegates_to_the_active_effect() {
    let mut params = EffectParams::defaults_for("crt").unwrap();
    assert!(params.domains().iter().any(|d| d.key == "distortion"));
    assert!(params.set_param("distortion", 2.0));
    assert_eq!(params.get_param("distortion"), Some(2.0));
    assert_eq!(params.get_param("step_size"), None);
    assert!(!params.set_param("step_size", 3.0));
}

#[test]
fn background_follows_each_effect() {
    assert_eq!(
        EffectParams::defaults_for("crt").unwrap().background(),
        Rgb::new(20, 20, 20)
    );
    assert_eq!(EffectParams::defaults_for("recolor").unwrap().background(), Rgb::WHITE);
    assert_eq!(EffectParams::defaults_for("distort").unwrap().background(), Rgb::WHITE);
    let distort = EffectParams::Distort(warp::DistortParams {
        bg: Rgb::new(10, 40, 90),
        ..Default::default()
    });
    assert_eq!(distort.background(), Rgb::new(10, 40, 90));
    assert_eq!(
        EffectParams::defaults_for("glyph").unwrap().background(),
        Rgb::BLACK
    );
}

#[test]
fn stippling_uses_finer_dot_range() {
    let EffectParams::Halftone(p) = EffectParams::defaults_for("stippling").unwrap() else {
        panic!("stippling is a halftone style");
    };
    assert_eq!(p.style, halftone::HalftoneStyle::Stipple);
    assert_eq!((p.min_dot_size, p.max_dot_size), (1.0, 10.0));
    assert_eq!(p.sanitized().min_dot_size, 1.0);

    let EffectParams::Halftone(dots) = EffectParams::defaults_for("dots").unwrap() else {
        panic!("dots is a halftone style");
    };
    assert_eq!((dots.min_dot_size, dots.max_dot_size), (2.0, 12.0));
}
