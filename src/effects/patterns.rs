//! Dark cells replaced by user pattern tiles chosen by darkness.

use crate::foundation::core::{PixelBuffer, Plane, Rgb};
use crate::foundation::error::FxResult;
use crate::foundation::math::clamp_param;
use crate::sampler::Sampler;

/// Pattern tiling parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PatternsParams {
    /// Only cells darker than this are drawn.
    pub threshold: f32,
    /// Cells across the canvas width, `5..=100`.
    pub grid_density: u32,
    /// Background color.
    pub bg: Rgb,
    /// Fill color when no tiles are loaded.
    pub fg: Rgb,
}

impl Default for PatternsParams {
    fn default() -> Self {
        Self {
            threshold: 128.0,
            grid_density: 20,
            bg: Rgb::WHITE,
            fg: Rgb::BLACK,
        }
    }
}

impl PatternsParams {
    /// Clamp every field into its domain.
    pub fn sanitized(&self) -> Self {
        Self {
            threshold: clamp_param(self.threshold, 0.0, 255.0, 128.0),
            grid_density: self.grid_density.clamp(5, 100),
            ..self.clone()
        }
    }

    /// Cell edge for a canvas `width` pixels wide, never below 4.
    pub fn cell_size(&self, width: u32) -> u32 {
        let density = self.grid_density.max(1);
        ((f64::from(width) / f64::from(density)).round() as u32).max(4)
    }
}

crate::animation::animatable!(PatternsParams {
    "threshold" => threshold: [0, 255, 1],
    "grid_density" => grid_density: [5, 100, 1],
});

/// Tile index for darkness `1 - gray/threshold`, clamped to the tile list.
pub fn tile_index(gray: f32, threshold: f32, tiles: usize) -> usize {
    if tiles == 0 || threshold <= 0.0 {
        return 0;
    }
    let t = (1.0 - gray / threshold).clamp(0.0, 1.0);
    ((t * (tiles - 1) as f32).floor() as usize).min(tiles - 1)
}

/// Composite straight-alpha `src` over opaque `dst`.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let a = f32::from(src[3]) / 255.0;
    let mix = |d: u8, s: u8| (f32::from(d) + (f32::from(s) - f32::from(d)) * a).round() as u8;
    [mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), 255]
}

/// Fill every dark cell with its tile scaled to the cell, or with `fg` at darkness opacity when
/// `tiles` is empty.
#[tracing::instrument(skip_all, fields(tiles = tiles.len()))]
pub fn render_patterns(
    luma: &Plane,
    tiles: &[PixelBuffer],
    params: &PatternsParams,
) -> FxResult<PixelBuffer> {
    let p = params.sanitized();
    let (w, h) = (luma.width(), luma.height());
    let cell = p.cell_size(w);
    let mut out = PixelBuffer::filled(w, h, p.bg.to_rgba())?;

    for r in 0..h.div_ceil(cell) {
        for c in 0..w.div_ceil(cell) {
            let (x0, y0) = (c * cell, r * cell);
            let half = f64::from(cell) / 2.0;
            let gray = luma.at_clamped(f64::from(x0) + half, f64::from(y0) + half);
            if gray >= p.threshold {
                continue;
            }
            if tiles.is_empty() {
                let t = 1.0 - gray / p.threshold;
                out.fill_rect(x0, y0, cell, cell, p.bg.lerp(p.fg, t).to_rgba());
                continue;
            }
            let tile = Sampler::new(&tiles[tile_index(gray, p.threshold, tiles.len())]);
            let (sx, sy) = (
                tile.width() as f32 / cell as f32,
                tile.height() as f32 / cell as f32,
            );
            for y in y0..(y0 + cell).min(h) {
                for x in x0..(x0 + cell).min(w) {
                    let src = tile.nearest((x - x0) as f32 * sx, (y - y0) as f32 * sy);
                    out.put_pixel(x, y, over(out.pixel(x, y), src));
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/patterns.rs"]
mod tests;
