//! Sobel edge magnitude and the edge-following dot halftone built on it.

use rayon::prelude::*;

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::clamp_param;
use crate::render::canvas::{Mark, ShapeCanvas};

/// Edge halftone parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Dots are drawn where magnitude exceeds `255 - threshold`.
    pub threshold: f32,
    /// Diameter at the weakest accepted edge.
    pub min_dot_size: f32,
    /// Diameter at full magnitude.
    pub max_dot_size: f32,
    /// Rounded squares instead of circles when positive.
    pub corner_radius: f32,
    /// Grid pitch in pixels, `2..=20`.
    pub step_size: u32,
    /// Background color.
    pub bg: Rgb,
    /// Dot color.
    pub fg: Rgb,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            threshold: 128.0,
            min_dot_size: 2.0,
            max_dot_size: 10.0,
            corner_radius: 0.0,
            step_size: 4,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl EdgeParams {
    /// Clamp every field into its domain; swapped dot sizes are reordered.
    pub fn sanitized(&self) -> Self {
        let a = clamp_param(self.min_dot_size, 0.0, 30.0, 2.0);
        let b = clamp_param(self.max_dot_size, 0.0, 30.0, 10.0);
        Self {
            threshold: clamp_param(self.threshold, 0.0, 255.0, 128.0),
            min_dot_size: a.min(b),
            max_dot_size: a.max(b),
            corner_radius: clamp_param(self.corner_radius, 0.0, 15.0, 0.0),
            step_size: self.step_size.clamp(2, 20),
            ..self.clone()
        }
    }
}

crate::animation::animatable!(EdgeParams {
    "threshold" => threshold: [0, 255, 1],
    "min_dot_size" => min_dot_size: [1, 20, 1],
    "max_dot_size" => max_dot_size: [1, 30, 1],
    "corner_radius" => corner_radius: [0, 15, 1],
    "step_size" => step_size: [2, 20, 1],
});

/// 3x3 Sobel gradient magnitude, capped at 255. The one-pixel border is 0.
pub fn sobel(luma: &Plane) -> FxResult<Plane> {
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    let mut out = Plane::zeros(luma.width(), luma.height())?;
    if w < 3 || h < 3 {
        return Ok(out);
    }
    let g = luma.values();
    out.values_mut()
        .par_chunks_exact_mut(w)
        .enumerate()
        .skip(1)
        .take(h - 2)
        .for_each(|(y, row)| {
            let at = |x: usize, y: usize| g[y * w + x];
            for x in 1..w - 1 {
                let gx = -at(x - 1, y - 1) + at(x + 1, y - 1) - 2.0 * at(x - 1, y)
                    + 2.0 * at(x + 1, y)
                    - at(x - 1, y + 1)
                    + at(x + 1, y + 1);
                let gy = -at(x - 1, y - 1) - 2.0 * at(x, y - 1) - at(x + 1, y - 1)
                    + at(x - 1, y + 1)
                    + 2.0 * at(x, y + 1)
                    + at(x + 1, y + 1);
                row[x] = (gx * gx + gy * gy).sqrt().min(255.0);
            }
        });
    Ok(out)
}

/// Dots on a `step_size` grid wherever the edge magnitude at the cell center is strong enough.
pub fn render_edge(edges: &Plane, params: &EdgeParams) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let step = p.step_size;
    let mut canvas = ShapeCanvas::new(edges.width(), edges.height(), p.bg)?;
    canvas.set_color(p.fg, 255);
    let mark = Mark::dot_or_rounded(p.corner_radius);
    let cutoff = 255.0 - p.threshold;
    let half = f64::from(step) / 2.0;

    for r in 0..edges.height().div_ceil(step) {
        for c in 0..edges.width().div_ceil(step) {
            let cx = f64::from(c * step) + half;
            let cy = f64::from(r * step) + half;
            let mag = edges.at_clamped(cx, cy);
            if mag > cutoff {
                let size = p.min_dot_size + mag / 255.0 * (p.max_dot_size - p.min_dot_size);
                canvas.mark(mark, cx, cy, f64::from(size));
            }
        }
    }
    canvas.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/edge.rs"]
mod tests;
