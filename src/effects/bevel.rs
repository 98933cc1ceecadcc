use rayon::prelude::*;

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::clamp_param;

/// Relief shading parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BevelParams {
    /// Gradient scale, `0.1..=10`.
    pub depth: f32,
    /// Light direction in degrees.
    pub light_angle: f32,
    /// Pixels brighter than this are cut out to `bg`.
    pub effect_threshold: f32,
    /// Cutout and shadow color.
    pub bg: Rgb,
    /// Fully lit color.
    pub fg: Rgb,
}

impl Default for BevelParams {
    fn default() -> Self {
        Self {
            depth: 3.0,
            light_angle: 135.0,
            effect_threshold: 128.0,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl BevelParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            depth: clamp_param(self.depth, 0.1, 10.0, 3.0),
            light_angle: if self.light_angle.is_finite() {
                self.light_angle.rem_euclid(360.0)
            } else {
                135.0
            },
            effect_threshold: clamp_param(self.effect_threshold, 0.0, 255.0, 128.0),
            ..self.clone()
        }
    }
}

crate::animation::animatable!(BevelParams {
    "depth" => depth: [0.1, 10.0, 0.1],
    "light_angle" => light_angle: [0, 360, 1],
    "effect_threshold" => effect_threshold: [0, 255, 1],
});

/// Pseudo-normal lighting of a luma plane.
///
/// Interior pixels brighter than `effect_threshold` and the one-pixel border are flat `bg`.
/// Everything else blends from `bg` (facing away) to `fg` (facing the light).
pub fn render_bevel(luma: &Plane, params: &BevelParams) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    let mut out = PixelBuffer::filled(luma.width(), luma.height(), p.bg.to_rgba())?;
    if w < 3 || h < 3 {
        return Ok(out);
    }
    let rad = p.light_angle.to_radians();
    let (lx, ly) = (rad.cos(), rad.sin());
    let g = luma.values();
    let stride = out.stride();

    out.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .skip(1)
        .take(h - 2)
        .for_each(|(y, row)| {
            for x in 1..w - 1 {
                let i = y * w + x;
                if g[i] > p.effect_threshold {
                    continue;
                }
                let dx = (g[i + 1] - g[i - 1]) * p.depth;
                let dy = (g[i + w] - g[i - w]) * p.depth;
                let dot = (dx * lx + dy * ly) / (dx * dx + dy * dy + 1.0).sqrt();
                let t = (dot + 1.0) / 2.0;
                row[x * 4..x * 4 + 4].copy_from_slice(&p.bg.lerp(p.fg, t).to_rgba());
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/bevel.rs"]
mod tests;
