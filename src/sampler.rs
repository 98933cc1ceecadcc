//! Clamped nearest-pixel reads and the scale/offset resample into the working canvas.

use rayon::prelude::*;

use crate::foundation::core::{Canvas, PixelBuffer};
use crate::foundation::error::FxResult;
use crate::foundation::math::luma;

/// Scale and offset applied to the source image before it is resampled into the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SourceTransform {
    /// Zoom in percent; 100 is identity.
    pub scale_pct: f32,
    /// Horizontal shift in percent of the canvas width.
    pub offset_x_pct: f32,
    /// Vertical shift in percent of the canvas height.
    pub offset_y_pct: f32,
}

impl Default for SourceTransform {
    fn default() -> Self {
        Self {
            scale_pct: 100.0,
            offset_x_pct: 0.0,
            offset_y_pct: 0.0,
        }
    }
}

impl SourceTransform {
    /// Return `true` when resampling would copy pixels unchanged.
    pub fn is_identity(&self) -> bool {
        self.scale_pct == 100.0 && self.offset_x_pct == 0.0 && self.offset_y_pct == 0.0
    }

    fn scale(&self) -> f32 {
        if self.scale_pct.is_finite() {
            (self.scale_pct / 100.0).clamp(0.01, 100.0)
        } else {
            1.0
        }
    }
}

/// Read-only view that never indexes out of bounds.
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'a> {
    buf: &'a PixelBuffer,
}

impl<'a> Sampler<'a> {
    /// Wrap a buffer.
    pub fn new(buf: &'a PixelBuffer) -> Self {
        Self { buf }
    }

    /// Width of the underlying buffer.
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Height of the underlying buffer.
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Nearest pixel to a logical coordinate, clamped to the buffer. Non-finite coordinates
    /// read the origin.
    pub fn nearest(&self, x: f32, y: f32) -> [u8; 4] {
        let (px, py) = self.clamp_coord(x, y);
        self.buf.pixel(px, py)
    }

    /// Integer lookup with clamping.
    pub fn at(&self, x: i64, y: i64) -> [u8; 4] {
        let px = x.clamp(0, i64::from(self.buf.width()) - 1) as u32;
        let py = y.clamp(0, i64::from(self.buf.height()) - 1) as u32;
        self.buf.pixel(px, py)
    }

    /// Luma of the nearest pixel.
    pub fn luma(&self, x: f32, y: f32) -> f32 {
        let [r, g, b, _] = self.nearest(x, y);
        luma(r, g, b)
    }

    /// Map a coordinate to the pixel that contains it (floor), clamped.
    pub fn clamp_coord(&self, x: f32, y: f32) -> (u32, u32) {
        let fx = if x.is_finite() { x.floor() } else { 0.0 };
        let fy = if y.is_finite() { y.floor() } else { 0.0 };
        let px = fx.clamp(0.0, (self.buf.width() - 1) as f32) as u32;
        let py = fy.clamp(0.0, (self.buf.height() - 1) as f32) as u32;
        (px, py)
    }
}

/// Resample `src` into a `canvas`-sized buffer through `transform`.
///
/// The source is centered on the canvas, scaled about the center and shifted by the offsets;
/// every canvas pixel reads the nearest source pixel, clamped.
pub fn resample(
    src: &PixelBuffer,
    canvas: Canvas,
    transform: &SourceTransform,
) -> FxResult<PixelBuffer> {
    if transform.is_identity() && canvas == Canvas::of(src) {
        return Ok(src.clone());
    }
    let mut out = PixelBuffer::filled(canvas.width, canvas.height, [0, 0, 0, 255])?;
    let s = transform.scale();
    let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
    let ox = finite(transform.offset_x_pct) / 100.0 * canvas.width as f32;
    let oy = finite(transform.offset_y_pct) / 100.0 * canvas.height as f32;
    let (ccx, ccy) = (canvas.width as f32 / 2.0, canvas.height as f32 / 2.0);
    let (scx, scy) = (src.width() as f32 / 2.0, src.height() as f32 / 2.0);
    let sampler = Sampler::new(src);
    let stride = out.stride();

    out.data_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = (y as f32 + 0.5 - ccy - oy) / s + scy;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let sx = (x as f32 + 0.5 - ccx - ox) / s + scx;
                px.copy_from_slice(&sampler.nearest(sx, sy));
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/sampler.rs"]
mod tests;
