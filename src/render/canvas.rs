//! Anti-aliased shape and glyph drawing over an opaque background, backed by `vello_cpu`.

use vello_cpu::kurbo::{Circle, Ellipse, Point, Rect, RoundedRect, Shape};

use crate::assets::font::GlyphFace;
use crate::foundation::core::{PixelBuffer, Rgb};
use crate::foundation::error::{FxError, FxResult};

const TOLERANCE: f64 = 0.1;

/// Fill shape of a single mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Mark {
    /// Circle of the given diameter.
    Dot,
    /// Axis-aligned square.
    Square,
    /// Square with rounded corners.
    Rounded(f64),
}

impl Mark {
    /// Dot when `corner_radius <= 0`, otherwise a rounded square.
    pub(crate) fn dot_or_rounded(corner_radius: f32) -> Self {
        if corner_radius > 0.0 {
            Self::Rounded(f64::from(corner_radius))
        } else {
            Self::Dot
        }
    }
}

/// Vector canvas that starts as a flat `bg` fill.
///
/// Every draw composites over the opaque background, so the premultiplied pixmap equals the
/// straight RGBA result and can be copied out directly.
pub(crate) struct ShapeCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl ShapeCanvas {
    pub(crate) fn new(width: u32, height: u32, bg: Rgb) -> FxResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| FxError::render("canvas width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| FxError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(FxError::validation("canvas dimensions must be non-zero"));
        }
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, 255));
        ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));
        Ok(Self { width, height, ctx })
    }

    /// Paint for subsequent fills.
    pub(crate) fn set_color(&mut self, color: Rgb, alpha: u8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, alpha));
    }

    /// Transform for subsequent fills.
    pub(crate) fn set_transform(&mut self, transform: kurbo::Affine) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::new(transform.as_coeffs()));
    }

    /// Fill `mark` centered at `(cx, cy)` with edge `size`. Non-positive or non-finite sizes draw
    /// nothing.
    pub(crate) fn mark(&mut self, mark: Mark, cx: f64, cy: f64, size: f64) {
        if !(size.is_finite() && size > 0.0 && cx.is_finite() && cy.is_finite()) {
            return;
        }
        let half = size / 2.0;
        match mark {
            Mark::Dot => {
                let path = Circle::new(Point::new(cx, cy), half).to_path(TOLERANCE);
                self.ctx.fill_path(&path);
            }
            Mark::Square => {
                self.ctx
                    .fill_rect(&Rect::new(cx - half, cy - half, cx + half, cy + half));
            }
            Mark::Rounded(radius) => {
                let r = radius.min(half);
                let path = RoundedRect::new(cx - half, cy - half, cx + half, cy + half, r)
                    .to_path(TOLERANCE);
                self.ctx.fill_path(&path);
            }
        }
    }

    /// Fill an axis-aligned ellipse inscribed in the given box.
    pub(crate) fn ellipse(&mut self, cx: f64, cy: f64, w: f64, h: f64) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let path = Ellipse::new(Point::new(cx, cy), (w / 2.0, h / 2.0), 0.0).to_path(TOLERANCE);
        self.ctx.fill_path(&path);
    }

    /// Fill the outline of `ch` with its line box's top-left corner at `(x, top)`.
    ///
    /// Characters without a glyph in `face` draw nothing.
    pub(crate) fn glyph(&mut self, face: &GlyphFace<'_>, ch: char, x: f64, top: f64) {
        let Some(id) = face.glyph_id(ch) else {
            return;
        };
        let glyph = vello_cpu::Glyph {
            id,
            x: x as f32,
            y: top as f32 + face.ascent(),
        };
        self.ctx
            .glyph_run(face.data())
            .font_size(face.size())
            .fill_glyphs(std::iter::once(glyph));
    }

    /// Rasterize everything drawn so far.
    pub(crate) fn finish(mut self) -> FxResult<PixelBuffer> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let mut data = pixmap.data_as_u8_slice().to_vec();
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        PixelBuffer::new(u32::from(self.width), u32::from(self.height), data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
