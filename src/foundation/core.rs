use crate::foundation::error::{FxError, FxResult};

/// Straight (non-premultiplied) RGBA8 image, row-major and tightly packed.
///
/// The constructor enforces `data.len() == width * height * 4` with non-zero dimensions, so every
/// consumer can index without re-validating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap decoded RGBA bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FxResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(FxError::validation(format!(
                "pixel buffer length {} does not match {width}x{height}x4 = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> FxResult<Self> {
        let expected = byte_len(width, height)?;
        let data = rgba.repeat(expected / 4);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        (self.width as usize) * 4
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes. The length cannot change through this view.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Read the pixel at `(x, y)`. Callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`. Callers must stay in bounds.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Fill an axis-aligned rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgba: [u8; 4]) {
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        for yy in y.min(self.height)..y1 {
            let row = (yy as usize) * self.stride();
            for xx in x.min(self.width)..x1 {
                let i = row + (xx as usize) * 4;
                self.data[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Return `true` when both buffers have the same dimensions.
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

fn byte_len(width: u32, height: u32) -> FxResult<usize> {
    if width == 0 || height == 0 {
        return Err(FxError::validation(format!(
            "pixel buffer dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| FxError::validation("pixel buffer size overflow"))
}

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or `#rgb`.
    pub fn from_hex(s: &str) -> FxResult<Self> {
        let h = s.trim().trim_start_matches('#');
        let nibble = |c: u8| -> FxResult<u8> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| FxError::validation(format!("invalid hex color '{s}'")))
        };
        let bytes = h.as_bytes();
        match bytes.len() {
            6 => {
                let mut c = [0u8; 3];
                for (i, out) in c.iter_mut().enumerate() {
                    *out = (nibble(bytes[2 * i])? << 4) | nibble(bytes[2 * i + 1])?;
                }
                Ok(Self::new(c[0], c[1], c[2]))
            }
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(FxError::validation(format!("invalid hex color '{s}'"))),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Opaque RGBA bytes.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Channels as an array.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear interpolation in sRGB byte space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| -> u8 {
            let a = f32::from(a);
            let b = f32::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl TryFrom<String> for Rgb {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Working canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Square canvas.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Canvas with the dimensions of `buf`.
    pub fn of(buf: &PixelBuffer) -> Self {
        Self {
            width: buf.width(),
            height: buf.height(),
        }
    }
}

/// Per-frame timing handed to [`crate::Engine::render`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// 0-based frame counter; mixed into per-frame random seeds.
    pub index: u64,
    /// Seconds since the host started rendering; drives time-varying effects.
    pub time_s: f64,
}

impl FrameInfo {
    /// The single frame of a static render.
    pub const STILL: FrameInfo = FrameInfo {
        index: 0,
        time_s: 0.0,
    };

    /// Frame `index` at a fixed frame rate.
    pub fn at(index: u64, fps: f64) -> Self {
        let time_s = if fps.is_finite() && fps > 0.0 {
            index as f64 / fps
        } else {
            0.0
        };
        Self { index, time_s }
    }
}

/// Single-channel float image with the same layout as [`PixelBuffer`].
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Plane {
    /// Plane of zeros.
    pub fn zeros(width: u32, height: u32) -> FxResult<Self> {
        let len = byte_len(width, height)? / 4;
        Ok(Self {
            width,
            height,
            values: vec![0.0; len],
        })
    }

    /// Rec. 601 luma of every pixel.
    pub fn luma_of(buf: &PixelBuffer) -> Self {
        let values = buf
            .data()
            .chunks_exact(4)
            .map(|px| crate::foundation::math::luma(px[0], px[1], px[2]))
            .collect();
        Self {
            width: buf.width(),
            height: buf.height(),
            values,
        }
    }

    /// Width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major samples.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Sample at `(x, y)`. Callers must stay in bounds.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Sample nearest to a float coordinate, clamped to the plane.
    pub fn at_clamped(&self, x: f64, y: f64) -> f32 {
        let fx = if x.is_finite() { x.floor() } else { 0.0 };
        let fy = if y.is_finite() { y.floor() } else { 0.0 };
        let px = fx.clamp(0.0, f64::from(self.width - 1)) as u32;
        let py = fy.clamp(0.0, f64::from(self.height - 1)) as u32;
        self.get(px, py)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
