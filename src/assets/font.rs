use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use skrifa::MetadataProvider as _;
use skrifa::instance::{LocationRef, Size};
use vello_cpu::peniko::{Blob, FontData};

use crate::foundation::error::{FxError, FxResult};

/// Parsed font used to draw glyph cells.
///
/// Cloning shares the underlying bytes.
#[derive(Clone)]
pub struct GlyphFont {
    data: FontData,
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont")
            .field("bytes", &self.data.data.data().len())
            .field("index", &self.data.index)
            .finish()
    }
}

impl GlyphFont {
    /// Font from TrueType/OpenType bytes. Collections (`.ttc`) use the face at `index`.
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> FxResult<Self> {
        skrifa::FontRef::from_index(&bytes, index)
            .map_err(|e| FxError::validation(format!("unreadable font data: {e}")))?;
        Ok(Self {
            data: FontData::new(Blob::from(bytes), index),
        })
    }

    /// Regular monospace face of the host system, looked up once per process.
    pub fn system_monospace() -> Option<Self> {
        static SYSTEM: OnceLock<Option<GlyphFont>> = OnceLock::new();
        SYSTEM.get_or_init(find_system_monospace).clone()
    }

    /// Whether the font maps `ch` to a real glyph.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.face(12.0).is_ok_and(|face| face.glyph_id(ch).is_some())
    }

    pub(crate) fn face(&self, size_px: f32) -> FxResult<GlyphFace<'_>> {
        let font = skrifa::FontRef::from_index(self.data.data.data(), self.data.index)
            .map_err(|e| FxError::render(format!("font became unreadable: {e}")))?;
        let metrics = font.metrics(Size::new(size_px), LocationRef::default());
        Ok(GlyphFace {
            data: &self.data,
            size: size_px,
            ascent: metrics.ascent,
            charmap: font.charmap(),
        })
    }
}

/// A font at one pixel size, ready to place glyphs by their top edge.
pub(crate) struct GlyphFace<'a> {
    data: &'a FontData,
    size: f32,
    ascent: f32,
    charmap: skrifa::charmap::Charmap<'a>,
}

impl GlyphFace<'_> {
    pub(crate) fn data(&self) -> &FontData {
        self.data
    }

    pub(crate) fn size(&self) -> f32 {
        self.size
    }

    /// Distance from the top of a line to its baseline.
    pub(crate) fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Glyph id for `ch`; `None` when the font only has `.notdef` for it.
    pub(crate) fn glyph_id(&self, ch: char) -> Option<u32> {
        self.charmap
            .map(ch)
            .map(|id| id.to_u32())
            .filter(|&id| id != 0)
    }
}

/// Read a font file.
pub fn load_font(path: impl AsRef<Path>) -> FxResult<GlyphFont> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    GlyphFont::from_bytes(bytes, 0)
}

fn find_system_monospace() -> Option<GlyphFont> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::Monospace],
        ..Default::default()
    };
    let id = db.query(&query).or_else(|| {
        db.faces()
            .find(|f| {
                f.monospaced
                    && f.style == fontdb::Style::Normal
                    && f.weight == fontdb::Weight::NORMAL
            })
            .map(|f| f.id)
    })?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    match GlyphFont::from_bytes(bytes, index) {
        Ok(font) => {
            tracing::debug!(faces = db.len(), "system monospace font loaded");
            Some(font)
        }
        Err(err) => {
            tracing::warn!(%err, "system monospace font rejected");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
