//! Grid-based point fields: rotated dot screens, stippling squares and soft gradient marks.

use kurbo::{Affine, Point};

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, clamp_param};
use crate::render::canvas::{Mark, ShapeCanvas};

/// Which grid family to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalftoneStyle {
    /// `step_size` dot screen sized by darkness.
    #[default]
    Dots,
    /// `x_squares` by `y_squares` cells sized by darkness.
    Stipple,
    /// `step_size` grid of marks whose size and opacity follow darkness.
    Gradient,
}

/// Grid layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridType {
    /// Aligned rows. Stipple draws squares.
    #[default]
    Regular,
    /// Odd dot rows shifted by half a step. Stipple draws circles.
    Benday,
}

/// Mark shape for [`HalftoneStyle::Gradient`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientShape {
    /// Squares.
    #[default]
    Rect,
    /// Circles.
    Ellipse,
}

/// Grid halftone parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HalftoneParams {
    /// Grid family.
    pub style: HalftoneStyle,
    /// Row layout for dots and stipple.
    pub grid: GridType,
    /// Only samples darker than this produce a mark.
    pub threshold: f32,
    /// Grid rotation about the canvas center, degrees.
    pub grid_angle: f32,
    /// Mark size at the threshold.
    pub min_dot_size: f32,
    /// Mark size at black.
    pub max_dot_size: f32,
    /// Rounded squares instead of dots when positive.
    pub corner_radius: f32,
    /// Grid pitch in pixels for dots and gradient.
    pub step_size: u32,
    /// Per-point jitter as a fraction of the step.
    pub noise: f32,
    /// Stipple columns.
    pub x_squares: u32,
    /// Stipple rows.
    pub y_squares: u32,
    /// Gradient mark shape.
    pub shape: GradientShape,
    /// Background color.
    pub bg: Rgb,
    /// Mark color.
    pub fg: Rgb,
}

impl Default for HalftoneParams {
    fn default() -> Self {
        Self {
            style: HalftoneStyle::Dots,
            grid: GridType::Regular,
            threshold: 128.0,
            grid_angle: 0.0,
            min_dot_size: 2.0,
            max_dot_size: 12.0,
            corner_radius: 0.0,
            step_size: 8,
            noise: 0.0,
            x_squares: 50,
            y_squares: 50,
            shape: GradientShape::Rect,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl HalftoneParams {
    /// Clamp every field into its domain; swapped sizes are reordered.
    pub fn sanitized(&self) -> Self {
        let a = clamp_param(self.min_dot_size, 0.0, 50.0, 2.0);
        let b = clamp_param(self.max_dot_size, 0.0, 50.0, 12.0);
        Self {
            threshold: clamp_param(self.threshold, 0.0, 255.0, 128.0),
            grid_angle: if self.grid_angle.is_finite() {
                self.grid_angle.rem_euclid(360.0)
            } else {
                0.0
            },
            min_dot_size: a.min(b),
            max_dot_size: a.max(b),
            corner_radius: clamp_param(self.corner_radius, 0.0, 25.0, 0.0),
            step_size: self.step_size.clamp(2, 30),
            noise: clamp_param(self.noise, 0.0, 1.0, 0.0),
            x_squares: self.x_squares.clamp(5, 200),
            y_squares: self.y_squares.clamp(5, 200),
            ..self.clone()
        }
    }
}

crate::animation::animatable!(HalftoneParams {
    "threshold" => threshold: [0, 255, 1],
    "grid_angle" => grid_angle: [0, 360, 1],
    "min_dot_size" => min_dot_size: [1, 50, 1],
    "max_dot_size" => max_dot_size: [1, 50, 1],
    "corner_radius" => corner_radius: [0, 25, 1],
    "step_size" => step_size: [2, 30, 1],
    "noise" => noise: [0.0, 1.0, 0.01],
    "x_squares" => x_squares: [5, 200, 1],
    "y_squares" => y_squares: [5, 200, 1],
});

/// One accepted grid point, in unrotated grid space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalftoneMark {
    /// Center before the grid rotation.
    pub center: Point,
    /// Edge length or diameter.
    pub size: f64,
    /// Darkness in `(0, 1]`.
    pub weight: f64,
}

/// Rotation of the grid about the canvas center.
pub fn grid_transform(width: u32, height: u32, angle_deg: f32) -> Affine {
    let c = Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
    Affine::translate(c.to_vec2())
        * Affine::rotate(f64::from(angle_deg).to_radians())
        * Affine::translate(-c.to_vec2())
}

/// Every accepted mark for `params.style`, sampled at its rotated position.
pub fn halftone_marks(luma: &Plane, params: &HalftoneParams, seed: u64) -> Vec<HalftoneMark> {
    let p = params.sanitized();
    let (w, h) = (f64::from(luma.width()), f64::from(luma.height()));
    let rotated = p.grid_angle != 0.0 && p.style != HalftoneStyle::Gradient;
    let xf = if rotated {
        grid_transform(luma.width(), luma.height(), p.grid_angle)
    } else {
        Affine::IDENTITY
    };

    let (cell_w, cell_h, cols, rows) = match p.style {
        HalftoneStyle::Stipple => (
            w / f64::from(p.x_squares),
            h / f64::from(p.y_squares),
            i64::from(p.x_squares),
            i64::from(p.y_squares),
        ),
        HalftoneStyle::Dots | HalftoneStyle::Gradient => {
            let s = f64::from(p.step_size);
            (
                s,
                s,
                i64::from(luma.width().div_ceil(p.step_size)),
                i64::from(luma.height().div_ceil(p.step_size)),
            )
        }
    };

    // A rotated grid must still cover the corners of the canvas.
    let (pad_c, pad_r) = if rotated {
        let diag = w.hypot(h);
        (
            ((diag - w) / 2.0 / cell_w).ceil() as i64 + 1,
            ((diag - h) / 2.0 / cell_h).ceil() as i64 + 1,
        )
    } else {
        (0, 0)
    };
    let margin = f64::from(p.max_dot_size).max(cell_w.max(cell_h));

    let mut rng = Rng64::new(seed);
    let mut marks = Vec::new();
    for r in -pad_r..rows + pad_r {
        for c in -pad_c..cols + pad_c {
            let mut cx = (c as f64 + 0.5) * cell_w;
            let mut cy = (r as f64 + 0.5) * cell_h;
            if p.style == HalftoneStyle::Dots {
                if p.grid == GridType::Benday && r.rem_euclid(2) == 1 {
                    cx += cell_w / 2.0;
                }
                if p.noise > 0.0 {
                    let n = f64::from(p.noise) * cell_w;
                    cx += (rng.next_f64_01() - 0.5) * n;
                    cy += (rng.next_f64_01() - 0.5) * n;
                }
            }
            let at = xf * Point::new(cx, cy);
            if rotated
                && (at.x < -margin || at.y < -margin || at.x > w + margin || at.y > h + margin)
            {
                continue;
            }
            let gray = luma.at_clamped(at.x, at.y);
            if gray >= p.threshold {
                continue;
            }
            let t = f64::from(1.0 - gray / p.threshold);
            let size = match p.style {
                HalftoneStyle::Gradient => cell_w * t,
                _ => f64::from(p.min_dot_size) + t * f64::from(p.max_dot_size - p.min_dot_size),
            };
            marks.push(HalftoneMark {
                center: Point::new(cx, cy),
                size,
                weight: t,
            });
        }
    }
    marks
}

/// Draw the point field for `params.style`.
#[tracing::instrument(skip_all, fields(style = ?params.style))]
pub fn render_halftone(luma: &Plane, params: &HalftoneParams, seed: u64) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let marks = halftone_marks(luma, &p, seed);
    let mut canvas = ShapeCanvas::new(luma.width(), luma.height(), p.bg)?;
    canvas.set_color(p.fg, 255);
    if p.style != HalftoneStyle::Gradient {
        canvas.set_transform(grid_transform(luma.width(), luma.height(), p.grid_angle));
    }

    let mark = match (p.style, p.grid) {
        (HalftoneStyle::Dots, _) => Mark::dot_or_rounded(p.corner_radius),
        (HalftoneStyle::Stipple, GridType::Regular) => Mark::Square,
        (HalftoneStyle::Stipple, GridType::Benday) => Mark::Dot,
        (HalftoneStyle::Gradient, _) => match p.shape {
            GradientShape::Rect => Mark::Square,
            GradientShape::Ellipse => Mark::Dot,
        },
    };
    for m in &marks {
        if p.style == HalftoneStyle::Gradient {
            canvas.set_color(p.fg, (m.weight * 255.0).round().clamp(0.0, 255.0) as u8);
        }
        canvas.mark(mark, m.center.x, m.center.y, m.size);
    }
    canvas.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/halftone.rs"]
mod tests;
