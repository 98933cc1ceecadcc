use super::*;

fn plane_from(w: u32, h: u32, f: impl Fn(u32, u32) -> u8) -> Plane {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = f(x, y);
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Plane::luma_of(&PixelBuffer::new(w, h, data).unwrap())
}

#[test]
fn bright_flat_image_is_solid_background() {
    let luma = plane_from(12, 9, |_, _| 220);
    let bg = Rgb::new(9, 80, 200);
    for depth in [0.1, 3.0, 10.0] {
        for angle in [0.0, 90.0, 135.0, 359.0] {
            let params = BevelParams {
                depth,
                light_angle: angle,
                effect_threshold: 128.0,
                bg,
                fg: Rgb::new(250, 250, 0),
            };
            let out = render_bevel(&luma, &params).unwrap();
            assert!(out.data().chunks_exact(4).all(|px| px == bg.to_rgba()));
        }
    }
}

#[test]
fn flat_dark_area_sits_halfway_between_colors() {
    let luma = plane_from(5, 5, |_, _| 40);
    let params = BevelParams {
        bg: Rgb::BLACK,
        fg: Rgb::WHITE,
        ..Default::default()
    };
    let out = render_bevel(&luma, &params).unwrap();
    assert_eq!(out.pixel(2, 2), [128, 128, 128, 255]);
    // Border stays background.
    assert_eq!(out.pixel(0, 2), [0, 0, 0, 255]);
    assert_eq!(out.pixel(4, 4), [0, 0, 0, 255]);
}

#[test]
fn ramp_facing_the_light_is_lit() {
    // Brightness increases to the right; light from angle 0 points along +x.
    let luma = plane_from(6, 4, |x, _| (x * 20) as u8);
    let params = BevelParams {
        light_angle: 0.0,
        bg: Rgb::BLACK,
        fg: Rgb::WHITE,
        ..Default::default()
    };
    let lit = render_bevel(&luma, &params).unwrap();
    let away = render_bevel(
        &luma,
        &BevelParams {
            light_angle: 180.0,
            ..params
        },
    )
    .unwrap();
    assert!(lit.pixel(2, 1)[0] > 200);
    assert!(away.pixel(2, 1)[0] < 55);
}

#[test]
fn tiny_images_are_all_background() {
    let luma = plane_from(2, 7, |_, _| 0);
    let out = render_bevel(&luma, &BevelParams::default()).unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px == Rgb::WHITE.to_rgba()));
}
