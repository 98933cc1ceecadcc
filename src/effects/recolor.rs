//! Scalar-channel gradient mapping with posterize, repeat and noise shaping.

use rayon::prelude::*;
use smallvec::{SmallVec, smallvec};

use crate::foundation::core::{PixelBuffer, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, clamp_param, luma, mix_seed};

/// Per-pixel scalar fed into the gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientSource {
    /// Rec. 601 luma.
    #[default]
    Luma,
    /// HSV hue.
    Hue,
    /// HSV saturation.
    Saturation,
}

/// A gradient color at a position in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Stop color.
    pub color: Rgb,
    /// Position in percent.
    pub position: f32,
}

impl ColorStop {
    /// Build a stop.
    pub fn new(color: Rgb, position: f32) -> Self {
        Self { color, position }
    }
}

/// Inline storage for the usual handful of stops.
pub type Stops = SmallVec<[ColorStop; 4]>;

/// Recolor parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecolorParams {
    /// Scalar channel.
    pub source: GradientSource,
    /// Posterize levels; `<= 1` disables it.
    pub posterize: u32,
    /// Uniform noise amplitude, `0..=1`.
    pub noise_intensity: f32,
    /// Noise feature scale, stored for presets.
    pub noise_scale: f32,
    /// Exponent applied as `t^(1/noise_gamma)`.
    pub noise_gamma: f32,
    /// Ramp repetitions, `1..=10`.
    pub repetitions: u32,
    /// Gradient stops in any order.
    pub stops: Stops,
}

impl Default for RecolorParams {
    fn default() -> Self {
        Self {
            source: GradientSource::Luma,
            posterize: 8,
            noise_intensity: 0.0,
            noise_scale: 0.01,
            noise_gamma: 1.0,
            repetitions: 1,
            stops: smallvec![
                ColorStop::new(Rgb::BLACK, 0.0),
                ColorStop::new(Rgb::new(255, 0, 0), 50.0),
                ColorStop::new(Rgb::WHITE, 100.0),
            ],
        }
    }
}

impl RecolorParams {
    /// Clamp every field into its domain and sort stops by position.
    pub fn sanitized(&self) -> Self {
        let mut stops: Stops = self
            .stops
            .iter()
            .map(|s| ColorStop::new(s.color, clamp_param(s.position, 0.0, 100.0, 0.0)))
            .collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self {
            posterize: self.posterize.min(32),
            noise_intensity: clamp_param(self.noise_intensity, 0.0, 1.0, 0.0),
            noise_scale: clamp_param(self.noise_scale, 0.001, 0.1, 0.01),
            noise_gamma: clamp_param(self.noise_gamma, 0.1, 3.0, 1.0),
            repetitions: self.repetitions.clamp(1, 10),
            stops,
            ..self.clone()
        }
    }
}

crate::animation::animatable!(RecolorParams {
    "posterize" => posterize: [2, 32, 1],
    "noise_intensity" => noise_intensity: [0.0, 1.0, 0.01],
    "noise_scale" => noise_scale: [0.001, 0.1, 0.001],
    "noise_gamma" => noise_gamma: [0.1, 3.0, 0.1],
    "repetitions" => repetitions: [1, 10, 1],
});

/// Scalar in `[0, 1]` for one pixel.
pub fn scalar(source: GradientSource, r: u8, g: u8, b: u8) -> f32 {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    match source {
        GradientSource::Luma => luma(r, g, b) / 255.0,
        GradientSource::Saturation => {
            if max == 0.0 {
                0.0
            } else {
                (max - min) / max
            }
        }
        GradientSource::Hue => {
            if max == min {
                return 0.0;
            }
            let d = max - min;
            let h = if max == rf {
                ((gf - bf) / d) % 6.0
            } else if max == gf {
                (bf - rf) / d + 2.0
            } else {
                (rf - gf) / d + 4.0
            };
            (if h < 0.0 { h + 6.0 } else { h }) / 6.0
        }
    }
}

/// Piecewise-linear color at `t` over position-sorted stops.
///
/// No stops give black, one stop gives its color, and `t` outside the stop span clamps to the end
/// colors. Coincident stops use a span of 1.
pub fn sample_gradient(stops: &[ColorStop], t: f32) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb::BLACK;
    };
    let pos = t * 100.0;
    if stops.len() == 1 || pos <= first.position {
        return first.color;
    }
    if pos >= last.position {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if pos >= a.position && pos <= b.position {
            let span = b.position - a.position;
            let span = if span == 0.0 { 1.0 } else { span };
            return a.color.lerp(b.color, (pos - a.position) / span);
        }
    }
    last.color
}

/// Map `t` through posterize, repeat, noise and gamma, in that order.
pub fn shape_scalar(t: f32, params: &RecolorParams, rng: &mut impl FnMut() -> f32) -> f32 {
    let mut t = t;
    if params.posterize > 1 {
        let levels = params.posterize as f32;
        t = (t * levels).round() / levels;
    }
    t = (t * params.repetitions as f32) % 1.0;
    if params.noise_intensity > 0.0 {
        t = (t + (rng() - 0.5) * params.noise_intensity).clamp(0.0, 1.0);
    }
    if params.noise_gamma != 1.0 {
        t = t.powf(1.0 / params.noise_gamma);
    }
    t
}

/// Recolor every pixel through the gradient.
#[tracing::instrument(skip_all)]
pub fn render_recolor(
    src: &PixelBuffer,
    params: &RecolorParams,
    seed: u64,
) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let mut out = src.clone();
    let stride = out.stride();
    out.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = Rng64::new(mix_seed(seed, &[y as u64]));
            let mut draw = || rng.next_f32_01();
            for px in row.chunks_exact_mut(4) {
                let t = shape_scalar(scalar(p.source, px[0], px[1], px[2]), &p, &mut draw);
                let c = sample_gradient(&p.stops, t);
                px.copy_from_slice(&c.to_rgba());
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/recolor.rs"]
mod tests;
