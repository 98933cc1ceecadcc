//! Coordinate warps: a displacement-map lookup and a brightness-driven dot offset field.

use rayon::prelude::*;

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::clamp_param;
use crate::render::canvas::ShapeCanvas;
use crate::sampler::Sampler;

/// Displacement-map warp parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DistortParams {
    /// Horizontal shift at a fully red (or fully black) map pixel, `0..=100`.
    pub x_shift: f32,
    /// Vertical shift driven by the map's green channel, `0..=100`.
    pub y_shift: f32,
    /// Fill of a frame rendered without a source image.
    pub bg: Rgb,
}

impl Default for DistortParams {
    fn default() -> Self {
        Self {
            x_shift: 20.0,
            y_shift: 20.0,
            bg: Rgb::WHITE,
        }
    }
}

impl DistortParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            x_shift: clamp_param(self.x_shift, 0.0, 100.0, 20.0),
            y_shift: clamp_param(self.y_shift, 0.0, 100.0, 20.0),
            bg: self.bg,
        }
    }
}

crate::animation::animatable!(DistortParams {
    "x_shift" => x_shift: [0, 100, 1],
    "y_shift" => y_shift: [0, 100, 1],
});

/// Source coordinate for destination `(x, y)` given the map pixel there.
///
/// A mid-gray map (128) leaves the pixel in place to within one step of rounding.
pub fn displaced_source(x: u32, y: u32, map_px: [u8; 4], params: &DistortParams) -> (i64, i64) {
    let mr = f32::from(map_px[0]) / 255.0;
    let mg = f32::from(map_px[1]) / 255.0;
    let sx = (x as f32 + (mr - 0.5) * params.x_shift * 2.0).round();
    let sy = (y as f32 + (mg - 0.5) * params.y_shift * 2.0).round();
    (sx as i64, sy as i64)
}

/// Read every pixel from its map-displaced source, clamped. Without a map the source is copied.
#[tracing::instrument(skip_all, fields(mapped = map.is_some()))]
pub fn render_distort(
    src: &PixelBuffer,
    map: Option<&PixelBuffer>,
    params: &DistortParams,
) -> FxResult<PixelBuffer> {
    let Some(map) = map else {
        return Ok(src.clone());
    };
    if !map.same_size(src) {
        return Err(FxError::validation(format!(
            "distortion map is {}x{}, expected {}x{}",
            map.width(),
            map.height(),
            src.width(),
            src.height()
        )));
    }
    let p = params.sanitized();
    let sampler = Sampler::new(src);
    let mut out = src.clone();
    let stride = out.stride();
    out.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let x = x as u32;
                let (sx, sy) = displaced_source(x, y, map.pixel(x, y), &p);
                let [r, g, b, _] = sampler.at(sx, sy);
                px.copy_from_slice(&[r, g, b, 255]);
            }
        });
    Ok(out)
}

/// Dot displacement parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplaceParams {
    /// Grid pitch in pixels, `2..=20`.
    pub step_size: u32,
    /// Diagonal offset between black and white cells, `0..=50`.
    pub displacement: f32,
    /// Dot diameter at black; white cells draw half of it.
    pub dot_size: f32,
    /// Background color.
    pub bg: Rgb,
    /// Dot color.
    pub fg: Rgb,
}

impl Default for DisplaceParams {
    fn default() -> Self {
        Self {
            step_size: 6,
            displacement: 10.0,
            dot_size: 4.0,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl DisplaceParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            step_size: self.step_size.clamp(2, 20),
            displacement: clamp_param(self.displacement, 0.0, 50.0, 10.0),
            dot_size: clamp_param(self.dot_size, 1.0, 20.0, 4.0),
            ..self.clone()
        }
    }
}

crate::animation::animatable!(DisplaceParams {
    "step_size" => step_size: [2, 20, 1],
    "displacement" => displacement: [0, 50, 1],
    "dot_size" => dot_size: [1, 20, 1],
});

/// Center and diameter of the dot for the cell whose center has brightness `t` in `[0, 1]`.
pub fn displaced_dot(cx: f64, cy: f64, t: f64, params: &DisplaceParams) -> (f64, f64, f64) {
    let shift = (t - 0.5) * f64::from(params.displacement);
    let size = f64::from(params.dot_size) * (1.0 - t * 0.5);
    (cx + shift, cy + shift, size)
}

/// One dot per grid cell, pushed diagonally by brightness and shrunk on light cells.
#[tracing::instrument(skip_all)]
pub fn render_displace(luma: &Plane, params: &DisplaceParams) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let step = p.step_size;
    let half = f64::from(step) / 2.0;
    let mut canvas = ShapeCanvas::new(luma.width(), luma.height(), p.bg)?;
    canvas.set_color(p.fg, 255);
    for r in 0..luma.height().div_ceil(step) {
        for c in 0..luma.width().div_ceil(step) {
            let cx = f64::from(c * step) + half;
            let cy = f64::from(r * step) + half;
            let t = f64::from(luma.at_clamped(cx, cy)) / 255.0;
            let (x, y, size) = displaced_dot(cx, cy, t, &p);
            canvas.ellipse(x, y, size, size);
        }
    }
    canvas.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/warp.rs"]
mod tests;
