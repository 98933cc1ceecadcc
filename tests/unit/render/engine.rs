use super::*;

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::filled(w, h, [0, 0, 0, 255]).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = ((x + y) * 255 / (w + h - 2)) as u8;
            buf.put_pixel(x, y, [v, v / 2, 255 - v, 255]);
        }
    }
    buf
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}

#[test]
fn missing_image_renders_flat_background() {
    let engine = Engine::new();
    let params = EffectParams::defaults_for("glyph").unwrap();
    let out = engine.render(&params, FrameInfo::STILL).unwrap();
    assert_eq!((out.width(), out.height()), (600, 600));
    assert!(out.data().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    assert!(engine.glyph_text(&Default::default(), FrameInfo::STILL).is_none());

    let crt = EffectParams::defaults_for("crt").unwrap();
    let out = engine.render(&crt, FrameInfo::STILL).unwrap();
    assert_eq!(out.pixel(300, 300), [20, 20, 20, 255]);

    let distort = EffectParams::Distort(warp::DistortParams {
        bg: crate::foundation::core::Rgb::new(200, 10, 10),
        ..Default::default()
    });
    let out = engine.render(&distort, FrameInfo::STILL).unwrap();
    assert_eq!(out.pixel(0, 599), [200, 10, 10, 255]);
}

#[test]
fn neutral_ingest_caches_an_identical_source() {
    let image = gradient(24, 16);
    let engine = Engine::from_ingest(Ingest::for_image(image.clone())).unwrap();
    assert!(engine.has_image());
    assert_eq!(engine.source(), Some(&image));
}

#[test]
fn empty_canvas_is_rejected_and_previous_state_kept() {
    let mut engine = Engine::from_ingest(Ingest::for_image(gradient(8, 8))).unwrap();
    let bad = Ingest {
        canvas: Canvas::square(0),
        ..Ingest::default()
    };
    assert!(engine.reconfigure(bad).is_err());
    assert!(engine.has_image());
    assert_eq!(engine.canvas(), Canvas::square(8));
}

#[test]
fn mismatched_distortion_map_is_rejected() {
    let ingest = Ingest {
        distortion_map: Some(PixelBuffer::filled(3, 3, [128, 128, 128, 255]).unwrap()),
        ..Ingest::for_image(gradient(8, 8))
    };
    let err = Engine::from_ingest(ingest).unwrap_err();
    assert!(err.to_string().contains("distortion map"));
}

#[test]
fn every_effect_fills_the_canvas_opaquely() {
    let ingest = Ingest {
        canvas: Canvas {
            width: 32,
            height: 20,
        },
        ..Ingest::for_image(gradient(24, 16))
    };
    let engine = Engine::from_ingest(ingest).unwrap();
    for kind in EffectParams::KINDS {
        let params = EffectParams::defaults_for(kind).unwrap();
        let out = engine.render(&params, FrameInfo::at(3, 30.0)).unwrap();
        assert_eq!((out.width(), out.height()), (32, 20), "{kind}");
        assert!(out.data().chunks_exact(4).all(|px| px[3] == 255), "{kind}");
    }
}

#[test]
fn frames_are_reproducible_and_seeded_per_index() {
    let engine = Engine::from_ingest(Ingest::for_image(gradient(24, 16))).unwrap();
    let params = EffectParams::Dither(dither::DitherParams {
        pattern: dither::DitherPattern::Random,
        ..Default::default()
    });
    let a = engine.render(&params, FrameInfo::at(0, 30.0)).unwrap();
    assert_eq!(a, engine.render(&params, FrameInfo::at(0, 30.0)).unwrap());
    assert_ne!(a, engine.render(&params, FrameInfo::at(1, 30.0)).unwrap());
}

#[test]
fn glyph_text_has_one_line_per_row() {
    let engine = Engine::from_ingest(Ingest::for_image(gradient(28, 28))).unwrap();
    let text = engine
        .glyph_text(&glyph::GlyphParams::default(), FrameInfo::STILL)
        .unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().all(|l| l.chars().count() == 4));
}

#[test]
fn glyph_frames_use_the_ingested_font() {
    let Some(font) = GlyphFont::system_monospace() else {
        eprintln!("no monospace system font installed; skipping");
        return;
    };
    let image = PixelBuffer::filled(14, 14, [255, 255, 255, 255]).unwrap();
    let ingest = Ingest {
        font: Some(font),
        ..Ingest::for_image(image.clone())
    };
    let engine = Engine::from_ingest(ingest).unwrap();
    assert!(engine.font().is_some());

    let params = glyph::GlyphParams::default();
    let drawn = engine
        .render(&EffectParams::Glyph(params.clone()), FrameInfo::STILL)
        .unwrap();
    let shaded = glyph::render_glyph(&Plane::luma_of(&image), &params, None, 0, 0.0).unwrap();
    assert_eq!((drawn.width(), drawn.height()), (14, 14));
    assert_ne!(drawn, shaded);
}
