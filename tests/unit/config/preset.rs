use super::*;

#[test]
fn empty_object_is_the_default_preset() {
    let preset = Preset::from_json_str("{}").unwrap();
    assert_eq!(preset, Preset::default());
    assert_eq!(preset.canvas_size, 600);
    assert_eq!(preset.effect.kind(), "dither");
}

#[test]
fn nested_sections_parse() {
    let json = r##"{
        "canvas_size": 300,
        "preprocess": { "blur": 2, "gamma": 1.5 },
        "effect": { "kind": "halftone", "style": "stipple", "fg": "#ff0000" },
        "animation": { "enabled": true, "speed": 1.5, "excluded": ["threshold"] },
        "fps": 12,
        "frames": 5
    }"##;
    let preset = Preset::from_json_str(json).unwrap();
    assert_eq!(preset.canvas_size, 300);
    assert_eq!(preset.preprocess.blur, 2);
    assert_eq!(preset.preprocess.white_point, 255);
    let EffectParams::Halftone(h) = &preset.effect else {
        panic!("expected halftone");
    };
    assert_eq!(h.style, crate::effects::halftone::HalftoneStyle::Stipple);
    assert_eq!(h.fg, crate::foundation::core::Rgb::new(255, 0, 0));
    assert!(preset.animation.enabled);
    assert!(preset.animation.excluded.contains("threshold"));
    assert_eq!(preset.fps, 12.0);
    preset.validate().unwrap();
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Preset::from_json_str(r#"{"effect": {"kind": "nope"}}"#).unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
    let err = Preset::from_reader("[1,".as_bytes()).unwrap_err();
    assert!(matches!(err, FxError::Serde(_)));
}

#[test]
fn validation_rejects_zero_canvas_and_fps() {
    let zero_canvas = Preset {
        canvas_size: 0,
        ..Preset::default()
    };
    assert!(zero_canvas.validate().is_err());
    let zero_fps = Preset {
        fps: 0.0,
        ..Preset::default()
    };
    assert!(zero_fps.validate().is_err());
    let nan_speed = Preset {
        animation: AnimationSettings {
            speed: f64::NAN,
            ..Default::default()
        },
        ..Preset::default()
    };
    assert!(matches!(nan_speed.validate(), Err(FxError::Animation(_))));
}

#[test]
fn json_text_round_trips() {
    let preset = Preset {
        effect: EffectParams::defaults_for("recolor").unwrap(),
        seed: 42,
        ..Preset::default()
    };
    let text = preset.to_json_string().unwrap();
    assert_eq!(Preset::from_json_str(&text).unwrap(), preset);
}

#[test]
fn missing_file_reports_its_path() {
    let err = Preset::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, FxError::Other(_)));
    assert!(format!("{err:#}").contains("not/here.json"));
}

#[test]
fn ingest_canvas_follows_the_image() {
    let preset = Preset::default();
    assert_eq!(preset.ingest(None).canvas, Canvas::square(600));
    let image = PixelBuffer::filled(600, 400, [0, 0, 0, 255]).unwrap();
    let ingest = preset.ingest(Some(image));
    assert_eq!(
        ingest.canvas,
        Canvas {
            width: 600,
            height: 400
        }
    );
}
