use std::path::Path;

use anyhow::Context;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{FxError, FxResult};

/// Decode any format `image` understands into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> FxResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> FxResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        FxError::Other(err) => FxError::Other(err.context(format!("decode '{}'", path.display()))),
        other => other,
    })
}

/// Resize so the longest edge equals `size`, keeping the aspect ratio (Triangle filter).
///
/// The short edge never drops below one pixel. A buffer already at the target size is returned
/// unchanged.
pub fn fit_to_canvas(buf: &PixelBuffer, size: u32) -> FxResult<PixelBuffer> {
    if size == 0 {
        return Err(FxError::validation("fit size must be > 0"));
    }
    let (w, h) = (buf.width(), buf.height());
    let long = w.max(h);
    let scale = f64::from(size) / f64::from(long);
    let nw = ((f64::from(w) * scale).round() as u32).max(1);
    let nh = ((f64::from(h) * scale).round() as u32).max(1);
    resize_exact(buf, nw, nh)
}

/// Resize to exactly `width x height` (Triangle filter), ignoring the aspect ratio.
///
/// A buffer already at that size is returned unchanged.
pub fn resize_exact(buf: &PixelBuffer, width: u32, height: u32) -> FxResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(FxError::validation(format!(
            "resize target must be non-empty, got {width}x{height}"
        )));
    }
    let (w, h) = (buf.width(), buf.height());
    if (width, height) == (w, h) {
        return Ok(buf.clone());
    }
    let img = image::RgbaImage::from_raw(w, h, buf.data().to_vec())
        .ok_or_else(|| FxError::validation("pixel buffer does not match its dimensions"))?;
    let resized =
        image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
    PixelBuffer::new(width, height, resized.into_raw())
}

/// Write `buf` as a PNG, creating parent directories.
pub fn save_png(path: impl AsRef<Path>, buf: &PixelBuffer) -> FxResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        buf.data(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
