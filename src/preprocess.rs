//! Source normalization applied once per structural change, before any effect runs.
//!
//! Order is fixed: blur, grain, gamma, levels. Each step is skipped at its neutral value, so
//! neutral parameters return a byte-identical copy of the input.

pub(crate) mod blur;

use rayon::prelude::*;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, clamp_u8, mix_seed};

/// Minimum accepted gamma; smaller or non-finite inputs are clamped to it.
pub const MIN_GAMMA: f32 = 0.01;

/// Preprocessing knobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Box blur radius in pixels.
    pub blur: u32,
    /// Grain amount in `[0, 1]`.
    pub grain: f32,
    /// Gamma, `> 0`.
    pub gamma: f32,
    /// Input level mapped to 0.
    pub black_point: u8,
    /// Input level mapped to 255.
    pub white_point: u8,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            blur: 0,
            grain: 0.0,
            gamma: 1.0,
            black_point: 0,
            white_point: 255,
        }
    }
}

impl PreprocessParams {
    /// Clamp every field into its domain.
    pub fn sanitized(self) -> Self {
        let grain = if self.grain.is_finite() {
            self.grain.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let gamma = if self.gamma.is_finite() {
            self.gamma.max(MIN_GAMMA)
        } else {
            1.0
        };
        Self {
            blur: self.blur.min(64),
            grain,
            gamma,
            ..self
        }
    }

    /// Return `true` when every step is a no-op.
    pub fn is_neutral(&self) -> bool {
        self.blur == 0
            && self.grain == 0.0
            && self.gamma == 1.0
            && self.black_point == 0
            && self.white_point == 255
    }
}

/// Run the preprocessing chain on a private copy of `src`.
///
/// `seed` drives the grain noise so the same inputs always produce the same output.
#[tracing::instrument(skip(src), fields(w = src.width(), h = src.height()))]
pub fn preprocess(
    src: &PixelBuffer,
    params: &PreprocessParams,
    seed: u64,
) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let (w, h) = (src.width(), src.height());
    let mut data = if p.blur > 0 {
        blur::box_blur_rgba8(src.data(), w, h, p.blur)?
    } else {
        src.data().to_vec()
    };

    if p.grain > 0.0 {
        apply_grain(&mut data, w, p.grain, seed);
    }
    if p.gamma != 1.0 {
        apply_gamma(&mut data, w, p.gamma);
    }
    if p.black_point > 0 || p.white_point < 255 {
        apply_levels(&mut data, w, p.black_point, p.white_point);
    }

    PixelBuffer::new(w, h, data)
}

fn apply_grain(data: &mut [u8], width: u32, amount: f32, seed: u64) {
    let half = amount * 255.0 / 2.0;
    data.par_chunks_exact_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = Rng64::new(mix_seed(seed, &[0x6772_6169_6e, y as u64]));
            for px in row.chunks_exact_mut(4) {
                for c in px.iter_mut().take(3) {
                    let noise = (rng.next_f32_01() * 2.0 - 1.0) * half;
                    *c = clamp_u8(f32::from(*c) + noise);
                }
            }
        });
}

fn apply_gamma(data: &mut [u8], width: u32, gamma: f32) {
    let inv = 1.0 / gamma;
    let lut: [u8; 256] =
        std::array::from_fn(|i| clamp_u8(255.0 * (i as f32 / 255.0).powf(inv)));
    apply_lut(data, width, &lut);
}

fn apply_levels(data: &mut [u8], width: u32, black: u8, white: u8) {
    let range = f32::from(white) - f32::from(black);
    let range = if range == 0.0 { 1.0 } else { range };
    let lut: [u8; 256] =
        std::array::from_fn(|i| clamp_u8((i as f32 - f32::from(black)) / range * 255.0));
    apply_lut(data, width, &lut);
}

fn apply_lut(data: &mut [u8], width: u32, lut: &[u8; 256]) {
    data.par_chunks_exact_mut(width as usize * 4)
        .for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                px[0] = lut[px[0] as usize];
                px[1] = lut[px[1] as usize];
                px[2] = lut[px[2] as usize];
            }
        });
}

#[cfg(test)]
#[path = "../tests/unit/preprocess/preprocess.rs"]
mod tests;
