//! Character-ramp mapping of a luma plane, with time-varying index offsets.
//!
//! The mapper produces a [`GlyphGrid`] that can be exported as text. Rendering draws each
//! character in `fg` at the top-left of its cell with a [`GlyphFont`]. Without a font, cells fall
//! back to flat tiles shaded by the glyph's ink density.

use crate::assets::font::GlyphFont;
use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::{Rng64, clamp_param, value_noise_2d};
use crate::render::canvas::ShapeCanvas;

const STANDARD: &str = " .:-=+*#%@";
const BLOCKS: &str = " ░▒▓█";
const SIMPLE: &str = " .:oO@";
const DETAILED: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Glyph pool for high chaos: every density-ranked character plus the block shades.
const EXTENDED: &str =
    ".'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$░▒▓█";

/// Built-in character ramps, ordered from empty to dense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphRamp {
    /// `" .:-=+*#%@"`.
    #[default]
    Standard,
    /// Space and the three shade blocks plus the full block.
    Blocks,
    /// `" .:oO@"`.
    Simple,
    /// 70 characters ordered by ink density.
    Detailed,
    /// [`GlyphParams::custom_ramp`]; falls back to `Standard` below two characters.
    Custom,
}

/// Glyph mapper parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlyphParams {
    /// Character ramp.
    pub ramp: GlyphRamp,
    /// Characters used by [`GlyphRamp::Custom`].
    pub custom_ramp: String,
    /// Map light to the start of the ramp instead of the end.
    pub reverse: bool,
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
    /// Glyph size in pixels.
    pub font_size: f32,
    /// Constant index shift.
    pub spread: f32,
    /// Peak index offset of the noise drift.
    pub drift_amount: f32,
    /// Noise frequency in cells.
    pub drift_scale: f32,
    /// Noise scroll rate per second.
    pub drift_speed: f32,
    /// Peak index offset of the traveling wave.
    pub wave_amplitude: f32,
    /// Wave frequency in radians per cell.
    pub wave_frequency: f32,
    /// Wave phase rate in radians per second.
    pub wave_speed: f32,
    /// Wave travel direction, degrees.
    pub wave_angle: f32,
    /// Peak per-cell random index offset.
    pub jitter: f32,
    /// Per-cell replacement probability, `0..=1`.
    pub chaos: f32,
    /// Draw cell outlines.
    pub show_borders: bool,
    /// Background color.
    pub bg: Rgb,
    /// Ink color.
    pub fg: Rgb,
}

impl Default for GlyphParams {
    fn default() -> Self {
        Self {
            ramp: GlyphRamp::Standard,
            custom_ramp: String::new(),
            reverse: false,
            cell_width: 7,
            cell_height: 14,
            font_size: 12.0,
            spread: 0.0,
            drift_amount: 0.0,
            drift_scale: 0.1,
            drift_speed: 1.0,
            wave_amplitude: 0.0,
            wave_frequency: 0.5,
            wave_speed: 1.0,
            wave_angle: 0.0,
            jitter: 0.0,
            chaos: 0.0,
            show_borders: false,
            bg: Rgb::BLACK,
            fg: Rgb::new(0, 255, 0),
        }
    }
}

impl GlyphParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            cell_width: self.cell_width.clamp(2, 64),
            cell_height: self.cell_height.clamp(2, 64),
            font_size: clamp_param(self.font_size, 4.0, 64.0, 12.0),
            spread: clamp_param(self.spread, -20.0, 20.0, 0.0),
            drift_amount: clamp_param(self.drift_amount, 0.0, 10.0, 0.0),
            drift_scale: clamp_param(self.drift_scale, 0.01, 1.0, 0.1),
            drift_speed: clamp_param(self.drift_speed, 0.0, 5.0, 1.0),
            wave_amplitude: clamp_param(self.wave_amplitude, 0.0, 10.0, 0.0),
            wave_frequency: clamp_param(self.wave_frequency, 0.0, 5.0, 0.5),
            wave_speed: clamp_param(self.wave_speed, 0.0, 10.0, 1.0),
            wave_angle: clamp_param(self.wave_angle, 0.0, 360.0, 0.0),
            jitter: clamp_param(self.jitter, 0.0, 5.0, 0.0),
            chaos: clamp_param(self.chaos, 0.0, 1.0, 0.0),
            ..self.clone()
        }
    }

    /// Active ramp, reversed if requested.
    pub fn ramp_chars(&self) -> Vec<char> {
        let custom: Vec<char> = self.custom_ramp.chars().collect();
        let mut chars = match self.ramp {
            GlyphRamp::Standard => STANDARD.chars().collect(),
            GlyphRamp::Blocks => BLOCKS.chars().collect(),
            GlyphRamp::Simple => SIMPLE.chars().collect(),
            GlyphRamp::Detailed => DETAILED.chars().collect(),
            GlyphRamp::Custom if custom.len() >= 2 => custom,
            GlyphRamp::Custom => STANDARD.chars().collect(),
        };
        if self.reverse {
            chars.reverse();
        }
        chars
    }
}

crate::animation::animatable!(GlyphParams {
    "cell_width" => cell_width: [2, 64, 1],
    "cell_height" => cell_height: [2, 64, 1],
    "font_size" => font_size: [4, 64, 1],
    "spread" => spread: [-20, 20, 1],
    "drift_amount" => drift_amount: [0.0, 10.0, 0.1],
    "drift_scale" => drift_scale: [0.01, 1.0, 0.01],
    "drift_speed" => drift_speed: [0.0, 5.0, 0.1],
    "wave_amplitude" => wave_amplitude: [0.0, 10.0, 0.1],
    "wave_frequency" => wave_frequency: [0.0, 5.0, 0.05],
    "wave_speed" => wave_speed: [0.0, 10.0, 0.1],
    "wave_angle" => wave_angle: [0, 360, 1],
    "jitter" => jitter: [0.0, 5.0, 0.1],
    "chaos" => chaos: [0.0, 1.0, 0.01],
});

/// Row-major character grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    cols: u32,
    rows: u32,
    glyphs: Vec<char>,
}

impl GlyphGrid {
    /// Columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Glyph at `(col, row)`.
    pub fn get(&self, col: u32, row: u32) -> char {
        self.glyphs[(row as usize) * (self.cols as usize) + (col as usize)]
    }

    /// Rows joined by `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.glyphs
            .chunks(self.cols as usize)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ink coverage of `ch` in `[0, 1]`: its rank in the detailed ramp, the block shade level, or 0.5
/// for characters outside both. Used to shade cells when no font is available.
pub fn ink_coverage(ch: char) -> f32 {
    if let Some(i) = BLOCKS.chars().position(|c| c == ch) {
        return i as f32 / 4.0;
    }
    let n = DETAILED.chars().count();
    match DETAILED.chars().position(|c| c == ch) {
        Some(i) => i as f32 / (n - 1) as f32,
        None => 0.5,
    }
}

/// Map every cell to a glyph at `time_s` seconds.
pub fn glyph_grid(luma: &Plane, params: &GlyphParams, seed: u64, time_s: f64) -> GlyphGrid {
    let p = params.sanitized();
    let ramp = p.ramp_chars();
    let extended: Vec<char> = EXTENDED.chars().collect();
    let len = ramp.len() as i64;
    let cols = luma.width().div_ceil(p.cell_width);
    let rows = luma.height().div_ceil(p.cell_height);
    let (cw, ch) = (f64::from(p.cell_width), f64::from(p.cell_height));

    let angle = f64::from(p.wave_angle).to_radians();
    let (dir_x, dir_y) = (angle.cos(), angle.sin());
    let t = if time_s.is_finite() { time_s } else { 0.0 };
    let drift_shift = t * f64::from(p.drift_speed);
    let wave_shift = t * f64::from(p.wave_speed);

    let mut rng = Rng64::new(seed);
    let mut glyphs = Vec::with_capacity((cols as usize) * (rows as usize));
    for r in 0..rows {
        for c in 0..cols {
            let (fc, fr) = (f64::from(c), f64::from(r));
            let gray = luma.at_clamped(((fc + 0.5) * cw).floor(), ((fr + 0.5) * ch).floor());
            let mut f = f64::from(gray) / 255.0 * (len - 1) as f64 + f64::from(p.spread);
            if p.drift_amount > 0.0 {
                let s = f64::from(p.drift_scale);
                f += value_noise_2d(seed, fc * s + drift_shift, fr * s) * f64::from(p.drift_amount);
            }
            if p.wave_amplitude > 0.0 {
                let phase = (dir_x * fc + dir_y * fr) * f64::from(p.wave_frequency) - wave_shift;
                f += phase.sin() * f64::from(p.wave_amplitude);
            }
            if p.jitter > 0.0 {
                f += (rng.next_f64_01() - 0.5) * 2.0 * f64::from(p.jitter);
            }
            let idx = if f.is_finite() {
                (f.round() as i64).rem_euclid(len) as usize
            } else {
                0
            };
            let mut glyph = ramp[idx];
            if p.chaos > 0.0 && rng.next_f32_01() < p.chaos {
                glyph = if p.chaos <= 0.5 {
                    ramp[rng.next_index(ramp.len())]
                } else {
                    extended[rng.next_index(extended.len())]
                };
            }
            glyphs.push(glyph);
        }
    }
    GlyphGrid { cols, rows, glyphs }
}

/// Draw every glyph of `grid` in `fg` over `bg`, one per cell.
///
/// Without a font each cell becomes a flat tile at the glyph's [`ink_coverage`].
pub fn rasterize_grid(
    grid: &GlyphGrid,
    width: u32,
    height: u32,
    params: &GlyphParams,
    font: Option<&GlyphFont>,
) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let mut out = match font {
        Some(font) => draw_glyphs(grid, width, height, &p, font)?,
        None => shade_cells(grid, width, height, &p)?,
    };
    if p.show_borders {
        let line = p.bg.lerp(p.fg, 0.4).to_rgba();
        for r in 0..=grid.rows() {
            out.fill_rect(0, r * p.cell_height, width, 1, line);
        }
        for c in 0..=grid.cols() {
            out.fill_rect(c * p.cell_width, 0, 1, height, line);
        }
    }
    Ok(out)
}

fn draw_glyphs(
    grid: &GlyphGrid,
    width: u32,
    height: u32,
    p: &GlyphParams,
    font: &GlyphFont,
) -> FxResult<PixelBuffer> {
    let face = font.face(p.font_size)?;
    let mut canvas = ShapeCanvas::new(width, height, p.bg)?;
    canvas.set_color(p.fg, 255);
    for r in 0..grid.rows() {
        let top = f64::from(r * p.cell_height);
        for c in 0..grid.cols() {
            let ch = grid.get(c, r);
            if !ch.is_whitespace() {
                canvas.glyph(&face, ch, f64::from(c * p.cell_width), top);
            }
        }
    }
    canvas.finish()
}

fn shade_cells(
    grid: &GlyphGrid,
    width: u32,
    height: u32,
    p: &GlyphParams,
) -> FxResult<PixelBuffer> {
    let mut out = PixelBuffer::filled(width, height, p.bg.to_rgba())?;
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            let cover = ink_coverage(grid.get(c, r));
            if cover > 0.0 {
                out.fill_rect(
                    c * p.cell_width,
                    r * p.cell_height,
                    p.cell_width,
                    p.cell_height,
                    p.bg.lerp(p.fg, cover).to_rgba(),
                );
            }
        }
    }
    Ok(out)
}

/// Map and rasterize in one pass.
#[tracing::instrument(skip_all, fields(ramp = ?params.ramp, font = font.is_some()))]
pub fn render_glyph(
    luma: &Plane,
    params: &GlyphParams,
    font: Option<&GlyphFont>,
    seed: u64,
    time_s: f64,
) -> FxResult<PixelBuffer> {
    let grid = glyph_grid(luma, params, seed, time_s);
    rasterize_grid(&grid, luma.width(), luma.height(), params, font)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glyph.rs"]
mod tests;
