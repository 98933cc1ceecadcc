//! File-level conveniences around the engine: decoding, fit-to-canvas, fonts and PNG output.

/// Image codecs through the `image` crate.
pub mod decode;
/// Font loading for glyph cells, from a file or the system font set.
pub mod font;

pub use decode::{decode_image, fit_to_canvas, load_image, resize_exact, save_png};
pub use font::{GlyphFont, load_font};
