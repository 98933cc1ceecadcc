//! Darkness-weighted rejection sampling followed by short-range repulsion.

use kurbo::{Point, Vec2};

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, clamp_param};
use crate::render::canvas::{Mark, ShapeCanvas};

/// Scatter parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScatterParams {
    /// Trial points per pixel, `0..=0.2`.
    pub density: f32,
    /// Dot diameter on white.
    pub min_dot_size: f32,
    /// Dot diameter on black; also sets the repulsion range.
    pub max_dot_size: f32,
    /// Relaxation passes, `0..=20`.
    pub relax_iterations: u32,
    /// Push per repelling neighbor, `0..=1`.
    pub relax_strength: f32,
    /// Background color.
    pub bg: Rgb,
    /// Dot color.
    pub fg: Rgb,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            density: 0.004,
            min_dot_size: 4.0,
            max_dot_size: 14.0,
            relax_iterations: 1,
            relax_strength: 0.16,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl ScatterParams {
    /// Clamp every field into its domain; swapped sizes are reordered.
    pub fn sanitized(&self) -> Self {
        let a = clamp_param(self.min_dot_size, 0.0, 50.0, 4.0);
        let b = clamp_param(self.max_dot_size, 0.0, 50.0, 14.0);
        Self {
            density: clamp_param(self.density, 0.0, 0.2, 0.004),
            min_dot_size: a.min(b),
            max_dot_size: a.max(b),
            relax_iterations: self.relax_iterations.min(20),
            relax_strength: clamp_param(self.relax_strength, 0.0, 1.0, 0.16),
            ..self.clone()
        }
    }
}

crate::animation::animatable!(ScatterParams {
    "density" => density: [0.0, 0.2, 0.001],
    "min_dot_size" => min_dot_size: [1, 50, 1],
    "max_dot_size" => max_dot_size: [1, 50, 1],
    "relax_iterations" => relax_iterations: [0, 20, 1],
    "relax_strength" => relax_strength: [0.0, 1.0, 0.01],
});

/// An accepted sample and the luma it was accepted on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterPoint {
    /// Position in pixel space.
    pub pos: Point,
    /// Luma at the trial position.
    pub gray: f32,
}

/// `floor(w * h * density)` uniform trials, each kept with probability `1 - luma / 255`.
pub fn scatter_points(luma: &Plane, density: f32, seed: u64) -> Vec<ScatterPoint> {
    let (w, h) = (f64::from(luma.width()), f64::from(luma.height()));
    let density = clamp_param(density, 0.0, 0.2, 0.0);
    let trials = (w * h * f64::from(density)).floor() as usize;
    let mut rng = Rng64::new(seed);
    let mut points = Vec::new();
    for _ in 0..trials {
        let pos = Point::new(rng.next_f64_01() * w, rng.next_f64_01() * h);
        let gray = luma.at_clamped(pos.x, pos.y);
        if rng.next_f32_01() < 1.0 - gray / 255.0 {
            points.push(ScatterPoint { pos, gray });
        }
    }
    points
}

/// One pass per iteration: every point moves by the mean of unit pushes away from neighbors
/// closer than `range`, scaled by `strength`, then is clamped to `[0, width] x [0, height]`.
///
/// Points update in order, so later points see earlier moves within the same pass.
pub fn relax(
    points: &mut [ScatterPoint],
    width: f64,
    height: f64,
    range: f64,
    strength: f64,
    iterations: u32,
) {
    for _ in 0..iterations {
        for i in 0..points.len() {
            let here = points[i].pos;
            let mut push = Vec2::ZERO;
            let mut count = 0u32;
            for (j, other) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                let d = here - other.pos;
                let dist = d.hypot();
                if dist > 0.0 && dist < range {
                    push += d / dist * strength;
                    count += 1;
                }
            }
            if count > 0 {
                let moved = here + push / f64::from(count);
                points[i].pos = Point::new(moved.x.clamp(0.0, width), moved.y.clamp(0.0, height));
            }
        }
    }
}

/// Scatter, relax and draw dots sized by the darkness they were accepted on.
#[tracing::instrument(skip_all)]
pub fn render_scatter(luma: &Plane, params: &ScatterParams, seed: u64) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let (w, h) = (f64::from(luma.width()), f64::from(luma.height()));
    let mut points = scatter_points(luma, p.density, seed);
    relax(
        &mut points,
        w,
        h,
        f64::from(p.max_dot_size) * 2.0,
        f64::from(p.relax_strength),
        p.relax_iterations,
    );
    tracing::trace!(points = points.len(), "scatter relaxed");

    let mut canvas = ShapeCanvas::new(luma.width(), luma.height(), p.bg)?;
    canvas.set_color(p.fg, 255);
    for pt in &points {
        let t = 1.0 - pt.gray / 255.0;
        let size = p.min_dot_size + t * (p.max_dot_size - p.min_dot_size);
        canvas.mark(Mark::Dot, pt.pos.x, pt.pos.y, f64::from(size));
    }
    canvas.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scatter.rs"]
mod tests;
