//! Error-diffusion, ordered and random dithering over a luma plane, independent RGB planes, or
//! a shared N-color palette.

use crate::effects::palette::{DistanceMetric, Palette, cube_steps};
use crate::foundation::core::{PixelBuffer, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, clamp_param, luma, mix_seed};

/// Classic 4x4 Bayer index matrix.
pub const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// How the quantization threshold is perturbed per pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DitherPattern {
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,
    /// Ordered 4x4 Bayer matrix.
    Bayer4x4,
    /// Uniform random threshold jitter.
    Random,
}

/// Which channels are dithered and what the output colors are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Luma only; output is `{bg, fg}`.
    #[default]
    Bw,
    /// Shared palette of `color_count` colors.
    FullColor,
    /// R, G and B dithered independently to `{0, 255}`.
    Halftone,
}

/// Dithering parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DitherParams {
    /// Threshold perturbation.
    pub pattern: DitherPattern,
    /// Channel handling.
    pub color_mode: ColorMode,
    /// Palette size for [`ColorMode::FullColor`], `2..=64`.
    pub color_count: u32,
    /// Nearest-color metric for the palette path.
    pub distance: DistanceMetric,
    /// Diffused error / noise scale, `0..=3`.
    pub strength: f32,
    /// Binary threshold for error diffusion and random dithering, `0..=255`.
    pub threshold: f32,
    /// Block size in pixels, `1..=10`.
    pub pixel_step: u32,
    /// Light / background color.
    pub bg: Rgb,
    /// Dark / foreground color.
    pub fg: Rgb,
}

impl Default for DitherParams {
    fn default() -> Self {
        Self {
            pattern: DitherPattern::FloydSteinberg,
            color_mode: ColorMode::Bw,
            color_count: 2,
            distance: DistanceMetric::Euclidean,
            strength: 1.0,
            threshold: 128.0,
            pixel_step: 1,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl DitherParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            color_count: self.color_count.clamp(2, 64),
            strength: clamp_param(self.strength, 0.0, 3.0, 1.0),
            threshold: clamp_param(self.threshold, 0.0, 255.0, 128.0),
            pixel_step: self.pixel_step.clamp(1, 10),
            ..self.clone()
        }
    }

    /// The exact set of colors the output may contain.
    pub fn output_palette(&self) -> Palette {
        let p = self.sanitized();
        match p.color_mode {
            ColorMode::Bw => Palette::generate(2, p.bg, p.fg),
            ColorMode::FullColor => Palette::generate(p.color_count, p.bg, p.fg),
            ColorMode::Halftone => Palette::generate(8, p.bg, p.fg),
        }
    }
}

crate::animation::animatable!(DitherParams {
    "color_count" => color_count: [2, 64, 1],
    "distance" => distance: [0, 2, 1],
    "strength" => strength: [0.0, 3.0, 0.1],
    "threshold" => threshold: [0, 255, 1],
    "pixel_step" => pixel_step: [1, 10, 1],
});

/// Dither `src` into a new opaque buffer of the same size.
pub fn render_dither(src: &PixelBuffer, params: &DitherParams, seed: u64) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let step = p.pixel_step;
    let cols = src.width().div_ceil(step) as usize;
    let rows = src.height().div_ceil(step) as usize;

    let block = |c: usize, r: usize| src.pixel(c as u32 * step, r as u32 * step);

    let colors: Vec<Rgb> = match p.color_mode {
        ColorMode::Bw => {
            let mut plane: Vec<f32> = (0..rows)
                .flat_map(|r| (0..cols).map(move |c| (c, r)))
                .map(|(c, r)| {
                    let [red, g, b, _] = block(c, r);
                    luma(red, g, b)
                })
                .collect();
            let mut rng = Rng64::new(mix_seed(seed, &[0]));
            quantize_plane(&mut plane, cols, rows, &p, &mut rng);
            plane
                .iter()
                .map(|&v| if v > 127.0 { p.bg } else { p.fg })
                .collect()
        }
        ColorMode::Halftone => {
            let mut planes: [Vec<f32>; 3] = std::array::from_fn(|ch| {
                (0..rows)
                    .flat_map(|r| (0..cols).map(move |c| (c, r)))
                    .map(|(c, r)| f32::from(block(c, r)[ch]))
                    .collect()
            });
            for (ch, plane) in planes.iter_mut().enumerate() {
                let mut rng = Rng64::new(mix_seed(seed, &[1 + ch as u64]));
                quantize_plane(plane, cols, rows, &p, &mut rng);
            }
            let bit = |v: f32| if v > 127.0 { 255 } else { 0 };
            (0..cols * rows)
                .map(|i| Rgb::new(bit(planes[0][i]), bit(planes[1][i]), bit(planes[2][i])))
                .collect()
        }
        ColorMode::FullColor => {
            let palette = Palette::generate(p.color_count, p.bg, p.fg);
            let mut work: Vec<[f32; 3]> = (0..rows)
                .flat_map(|r| (0..cols).map(move |c| (c, r)))
                .map(|(c, r)| {
                    let [red, g, b, _] = block(c, r);
                    [f32::from(red), f32::from(g), f32::from(b)]
                })
                .collect();
            let mut rng = Rng64::new(mix_seed(seed, &[4]));
            quantize_palette(&mut work, cols, rows, &palette, &p, &mut rng)
        }
    };

    let mut out = PixelBuffer::filled(src.width(), src.height(), [0, 0, 0, 255])?;
    for r in 0..rows {
        for c in 0..cols {
            out.fill_rect(
                c as u32 * step,
                r as u32 * step,
                step,
                step,
                colors[r * cols + c].to_rgba(),
            );
        }
    }
    Ok(out)
}

/// Binary-quantize one channel plane in place to `{0, 255}` using `params.pattern`.
pub(crate) fn quantize_plane(
    plane: &mut [f32],
    width: usize,
    height: usize,
    params: &DitherParams,
    rng: &mut Rng64,
) {
    match params.pattern {
        DitherPattern::FloydSteinberg => {
            floyd_steinberg(plane, width, height, params.threshold, params.strength);
        }
        DitherPattern::Bayer4x4 => {
            for y in 0..height {
                for x in 0..width {
                    let t = bayer_threshold(x, y);
                    let v = &mut plane[y * width + x];
                    *v = if *v > t { 255.0 } else { 0.0 };
                }
            }
        }
        DitherPattern::Random => {
            for v in plane.iter_mut() {
                let t = params.threshold + (rng.next_f32_01() - 0.5) * 128.0 * params.strength;
                *v = if *v > t { 255.0 } else { 0.0 };
            }
        }
    }
}

/// Floyd-Steinberg over a single plane.
///
/// `strength` scales the diffused error only; the quantization step itself is a plain threshold.
pub fn floyd_steinberg(
    plane: &mut [f32],
    width: usize,
    height: usize,
    threshold: f32,
    strength: f32,
) {
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = plane[idx];
            let q = if old > threshold { 255.0 } else { 0.0 };
            plane[idx] = q;
            let err = (old - q) * strength;
            diffuse(plane, width, height, x, y, |v, w| *v += err * w);
        }
    }
}

/// Pixel-space threshold of the Bayer matrix at `(x, y)`.
pub fn bayer_threshold(x: usize, y: usize) -> f32 {
    f32::from(BAYER_4X4[y % 4][x % 4]) / 16.0 * 255.0
}

fn quantize_palette(
    work: &mut [[f32; 3]],
    width: usize,
    height: usize,
    palette: &Palette,
    params: &DitherParams,
    rng: &mut Rng64,
) -> Vec<Rgb> {
    let steps = if palette.len() == 2 {
        2
    } else {
        cube_steps(palette.len() as u32)
    };
    let spread = 255.0 / (steps - 1) as f32 * params.strength;
    let mut out = Vec::with_capacity(work.len());

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = work[idx];
            let q = match params.pattern {
                DitherPattern::FloydSteinberg => {
                    let q = palette.nearest(old, params.distance);
                    let qc = q.channels();
                    let err: [f32; 3] =
                        std::array::from_fn(|c| (old[c] - f32::from(qc[c])) * params.strength);
                    diffuse(work, width, height, x, y, |v, w| {
                        for c in 0..3 {
                            v[c] += err[c] * w;
                        }
                    });
                    q
                }
                DitherPattern::Bayer4x4 => {
                    let bias = (f32::from(BAYER_4X4[y % 4][x % 4]) / 16.0 - 0.5) * spread;
                    palette.nearest(old.map(|v| v + bias), params.distance)
                }
                DitherPattern::Random => {
                    let bias = (rng.next_f32_01() - 0.5) * spread;
                    palette.nearest(old.map(|v| v + bias), params.distance)
                }
            };
            out.push(q);
        }
    }
    out
}

/// Apply `add(cell, weight)` to the four Floyd-Steinberg neighbors that are still unvisited.
fn diffuse<T>(
    buf: &mut [T],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    mut add: impl FnMut(&mut T, f32),
) {
    let idx = y * width + x;
    if x + 1 < width {
        add(&mut buf[idx + 1], 7.0 / 16.0);
    }
    if y + 1 < height {
        let below = idx + width;
        if x > 0 {
            add(&mut buf[below - 1], 3.0 / 16.0);
        }
        add(&mut buf[below], 5.0 / 16.0);
        if x + 1 < width {
            add(&mut buf[below + 1], 1.0 / 16.0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dither.rs"]
mod tests;
