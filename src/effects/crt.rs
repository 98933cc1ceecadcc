//! Cathode-ray tube simulation: barrel distortion, chromatic aberration, scanlines, phosphor
//! dot mask, glow and bloom.

use rayon::prelude::*;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::FxResult;
use crate::foundation::math::{clamp_param, clamp_u8, safe_denom};
use crate::sampler::Sampler;

/// Simulated display type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TubeKind {
    /// Hard scanlines plus an RGB dot mask.
    #[default]
    Monitor,
    /// Hard scanlines only.
    Tv,
    /// Soft sinusoidal scanlines.
    Lcd,
}

/// Blend mode recorded for bloom. Accepted and kept for presets; the shading does not read it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomMode {
    /// Screen blend.
    #[default]
    Screen,
    /// Additive blend.
    Add,
    /// Per-channel maximum.
    Lighten,
}

/// CRT parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CrtParams {
    /// Display type.
    pub kind: TubeKind,
    /// Barrel strength, `0..=1`.
    pub distortion: f32,
    /// Dot mask width multiplier.
    pub dot_scale: f32,
    /// Scanline and dot pitch in pixels.
    pub dot_pitch: f32,
    /// Scanline darkening, `0..=1`.
    pub falloff: f32,
    /// Reserved.
    pub glow_radius: f32,
    /// Uniform brightness boost, `0..=2`.
    pub glow_intensity: f32,
    /// Reserved.
    pub bloom_mode: BloomMode,
    /// Average brightness above which bloom applies.
    pub bloom_threshold: f32,
    /// Bloom strength, `0..=2`.
    pub bloom_intensity: f32,
    /// Reserved.
    pub bloom_radius: f32,
    /// Red channel horizontal shift in pixels.
    pub red_offset_x: f32,
    /// Red channel vertical shift in pixels.
    pub red_offset_y: f32,
    /// Blue channel horizontal shift in pixels.
    pub blue_offset_x: f32,
    /// Blue channel vertical shift in pixels.
    pub blue_offset_y: f32,
}

impl Default for CrtParams {
    fn default() -> Self {
        Self {
            kind: TubeKind::Monitor,
            distortion: 0.1,
            dot_scale: 1.0,
            dot_pitch: 3.0,
            falloff: 0.3,
            glow_radius: 2.0,
            glow_intensity: 0.5,
            bloom_mode: BloomMode::Screen,
            bloom_threshold: 200.0,
            bloom_intensity: 0.3,
            bloom_radius: 4.0,
            red_offset_x: 1.0,
            red_offset_y: 0.0,
            blue_offset_x: -1.0,
            blue_offset_y: 0.0,
        }
    }
}

impl CrtParams {
    /// Clamp every field into its domain. Offsets are only made finite, so extreme shifts are
    /// still accepted and clamped per sample.
    pub fn sanitized(&self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            distortion: clamp_param(self.distortion, -10.0, 10.0, 0.1),
            dot_scale: clamp_param(self.dot_scale, 0.5, 5.0, 1.0),
            dot_pitch: clamp_param(self.dot_pitch, 1.0, 10.0, 3.0),
            falloff: clamp_param(self.falloff, 0.0, 1.0, 0.3),
            glow_intensity: clamp_param(self.glow_intensity, 0.0, 2.0, 0.5),
            bloom_threshold: clamp_param(self.bloom_threshold, 0.0, 255.0, 200.0),
            bloom_intensity: clamp_param(self.bloom_intensity, 0.0, 2.0, 0.3),
            red_offset_x: finite(self.red_offset_x),
            red_offset_y: finite(self.red_offset_y),
            blue_offset_x: finite(self.blue_offset_x),
            blue_offset_y: finite(self.blue_offset_y),
            ..self.clone()
        }
    }
}

crate::animation::animatable!(CrtParams {
    "distortion" => distortion: [0.0, 1.0, 0.01],
    "dot_scale" => dot_scale: [0.5, 5.0, 0.1],
    "dot_pitch" => dot_pitch: [1, 10, 1],
    "falloff" => falloff: [0.0, 1.0, 0.01],
    "glow_radius" => glow_radius: [0, 10, 1],
    "glow_intensity" => glow_intensity: [0.0, 2.0, 0.01],
    "bloom_threshold" => bloom_threshold: [0, 255, 1],
    "bloom_intensity" => bloom_intensity: [0.0, 2.0, 0.01],
    "bloom_radius" => bloom_radius: [0, 20, 1],
    "red_offset_x" => red_offset_x: [-10, 10, 1],
    "red_offset_y" => red_offset_y: [-10, 10, 1],
    "blue_offset_x" => blue_offset_x: [-10, 10, 1],
    "blue_offset_y" => blue_offset_y: [-10, 10, 1],
});

/// Source pixel read for destination `(x, y)` after barrel distortion, before channel offsets.
/// Always inside the buffer.
pub fn barrel_source(x: u32, y: u32, width: u32, height: u32, distortion: f32) -> (i64, i64) {
    let (w, h) = (width as f32, height as f32);
    let cx = x as f32 / w - 0.5;
    let cy = y as f32 / h - 0.5;
    let d = 1.0 + (cx * cx + cy * cy) * distortion;
    let clamp = |v: f32, extent: u32| -> i64 {
        let v = if v.is_finite() { v.round() } else { 0.0 };
        (v as i64).clamp(0, i64::from(extent) - 1)
    };
    (clamp((cx * d + 0.5) * w, width), clamp((cy * d + 0.5) * h, height))
}

/// Shade `src` as a CRT.
#[tracing::instrument(skip_all, fields(kind = ?params.kind))]
pub fn render_crt(src: &PixelBuffer, params: &CrtParams) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let (w, h) = (src.width(), src.height());
    let sampler = Sampler::new(src);
    let mut out = PixelBuffer::filled(w, h, [0, 0, 0, 255])?;
    let stride = out.stride();

    let pitch_rows = (p.dot_pitch.round() as u32).max(1);
    let mask_period = p.dot_pitch * p.dot_scale;
    let mask_step = (mask_period.round() as u32).max(1);
    let glow = 1.0 + p.glow_intensity * 0.2;
    let bloom_den = safe_denom(255.0 - p.bloom_threshold);
    let offset = |v: f32| v.round() as i64;
    let (rox, roy) = (offset(p.red_offset_x), offset(p.red_offset_y));
    let (box_, boy) = (offset(p.blue_offset_x), offset(p.blue_offset_y));

    out.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            let scanline = match p.kind {
                TubeKind::Monitor | TubeKind::Tv => {
                    if y % pitch_rows == 0 {
                        p.falloff
                    } else {
                        1.0
                    }
                }
                TubeKind::Lcd => {
                    1.0 - p.falloff
                        * 0.3
                        * (y as f32 * std::f32::consts::PI / p.dot_pitch).sin().abs()
                }
            };
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let x = x as u32;
                let (sx, sy) = barrel_source(x, y, w, h, p.distortion);
                let red = sampler.at(sx.saturating_add(rox), sy.saturating_add(roy));
                let blue = sampler.at(sx.saturating_add(box_), sy.saturating_add(boy));
                let mut r = f32::from(red[0]);
                let mut g = f32::from(sampler.at(sx, sy)[1]);
                let mut b = f32::from(blue[2]);

                if p.kind == TubeKind::Monitor {
                    let phase = (x % mask_step) as f32 / mask_period;
                    if phase < 0.33 {
                        g *= 0.7;
                        b *= 0.7;
                    } else if phase < 0.66 {
                        r *= 0.7;
                        b *= 0.7;
                    } else {
                        r *= 0.7;
                        g *= 0.7;
                    }
                }

                let k = scanline * glow;
                r *= k;
                g *= k;
                b *= k;

                if p.bloom_intensity > 0.0 {
                    let avg = (r + g + b) / 3.0;
                    if avg > p.bloom_threshold {
                        let bonus =
                            (avg - p.bloom_threshold) / bloom_den * p.bloom_intensity * 50.0;
                        r = (r + bonus).min(255.0);
                        g = (g + bonus).min(255.0);
                        b = (b + bonus).min(255.0);
                    }
                }

                px[0] = clamp_u8(r);
                px[1] = clamp_u8(g);
                px[2] = clamp_u8(b);
                px[3] = 255;
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/crt.rs"]
mod tests;
