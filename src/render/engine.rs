use crate::assets::font::GlyphFont;
use crate::effects::EffectParams;
use crate::effects::{
    automaton, bevel, crt, dither, edge, glyph, halftone, patterns, recolor, scatter, warp,
};
use crate::foundation::core::{Canvas, FrameInfo, PixelBuffer, Plane};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::mix_seed;
use crate::preprocess::{PreprocessParams, preprocess};
use crate::sampler::{SourceTransform, resample};

/// Default square canvas edge.
pub const DEFAULT_CANVAS_SIZE: u32 = 600;

/// Structural inputs of the engine. Changing any of these requires [`Engine::reconfigure`].
#[derive(Clone, Debug)]
pub struct Ingest {
    /// Decoded source image, any size. `None` renders flat background frames.
    pub image: Option<PixelBuffer>,
    /// Displacement map for [`EffectParams::Distort`]; must match the source image size.
    pub distortion_map: Option<PixelBuffer>,
    /// Tiles for [`EffectParams::Patterns`], any sizes.
    pub pattern_tiles: Vec<PixelBuffer>,
    /// Font for [`EffectParams::Glyph`]. `None` uses the system monospace face when there is one.
    pub font: Option<GlyphFont>,
    /// Working canvas.
    pub canvas: Canvas,
    /// Source placement on the canvas.
    pub transform: SourceTransform,
    /// Preprocessing applied once after placement.
    pub preprocess: PreprocessParams,
    /// Base seed for grain and every per-frame random draw.
    pub seed: u64,
}

impl Default for Ingest {
    fn default() -> Self {
        Self {
            image: None,
            distortion_map: None,
            pattern_tiles: Vec::new(),
            font: None,
            canvas: Canvas::square(DEFAULT_CANVAS_SIZE),
            transform: SourceTransform::default(),
            preprocess: PreprocessParams::default(),
            seed: 0,
        }
    }
}

impl Ingest {
    /// Ingest for `image` on a canvas of the image's own size.
    pub fn for_image(image: PixelBuffer) -> Self {
        Self {
            canvas: Canvas::of(&image),
            image: Some(image),
            ..Self::default()
        }
    }
}

/// Buffers derived once per structural change.
#[derive(Debug)]
struct Prepared {
    rgba: PixelBuffer,
    luma: Plane,
    edges: Plane,
    distortion_map: Option<PixelBuffer>,
}

/// Two-tier effect engine: [`Engine::reconfigure`] caches the placed and preprocessed source,
/// [`Engine::render`] runs one effect over the cache.
///
/// `render` takes `&self`, so one engine can serve frames to many threads.
#[derive(Debug)]
pub struct Engine {
    canvas: Canvas,
    seed: u64,
    prepared: Option<Prepared>,
    tiles: Vec<PixelBuffer>,
    font: Option<GlyphFont>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            canvas: Canvas::square(DEFAULT_CANVAS_SIZE),
            seed: 0,
            prepared: None,
            tiles: Vec::new(),
            font: None,
        }
    }
}

impl Engine {
    /// Engine without a source image on the default canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine configured from `ingest`.
    pub fn from_ingest(ingest: Ingest) -> FxResult<Self> {
        let mut engine = Self::new();
        engine.reconfigure(ingest)?;
        Ok(engine)
    }

    /// Working canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether a source image is loaded.
    pub fn has_image(&self) -> bool {
        self.prepared.is_some()
    }

    /// Font used for glyph frames, if any.
    pub fn font(&self) -> Option<&GlyphFont> {
        self.font.as_ref()
    }

    /// Placed and preprocessed source, if any.
    pub fn source(&self) -> Option<&PixelBuffer> {
        self.prepared.as_ref().map(|p| &p.rgba)
    }

    /// Replace every structural input. On error the previous configuration is kept.
    #[tracing::instrument(skip_all, fields(
        width = ingest.canvas.width,
        height = ingest.canvas.height,
        image = ingest.image.is_some(),
        tiles = ingest.pattern_tiles.len(),
    ))]
    pub fn reconfigure(&mut self, ingest: Ingest) -> FxResult<()> {
        let canvas = ingest.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(FxError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        let prepared = match &ingest.image {
            Some(image) => Some(prepare(image, &ingest)?),
            None => {
                if ingest.distortion_map.is_some() {
                    tracing::debug!("distortion map ignored without a source image");
                }
                None
            }
        };

        self.canvas = canvas;
        self.seed = ingest.seed;
        self.prepared = prepared;
        self.tiles = ingest.pattern_tiles;
        self.font = ingest.font.or_else(|| {
            let system = GlyphFont::system_monospace();
            if system.is_none() {
                tracing::warn!("no monospace font found; glyph cells will be shaded tiles");
            }
            system
        });
        tracing::debug!("engine reconfigured");
        Ok(())
    }

    /// Render one frame of `params` over the cached source.
    ///
    /// Without a source image the frame is a flat fill of the effect's background color.
    #[tracing::instrument(skip_all, fields(kind = params.kind(), frame = frame.index))]
    pub fn render(&self, params: &EffectParams, frame: FrameInfo) -> FxResult<PixelBuffer> {
        let Some(prep) = &self.prepared else {
            return PixelBuffer::filled(
                self.canvas.width,
                self.canvas.height,
                params.background().to_rgba(),
            );
        };
        let seed = self.frame_seed(frame);
        match params {
            EffectParams::Dither(p) => dither::render_dither(&prep.rgba, p, seed),
            EffectParams::Automaton(p) => automaton::render_automaton(&prep.luma, p),
            EffectParams::Crt(p) => crt::render_crt(&prep.rgba, p),
            EffectParams::Bevel(p) => bevel::render_bevel(&prep.luma, p),
            EffectParams::Edge(p) => edge::render_edge(&prep.edges, p),
            EffectParams::Halftone(p) => halftone::render_halftone(&prep.luma, p, seed),
            EffectParams::Scatter(p) => scatter::render_scatter(&prep.luma, p, seed),
            EffectParams::Recolor(p) => recolor::render_recolor(&prep.rgba, p, seed),
            EffectParams::Glyph(p) => {
                glyph::render_glyph(&prep.luma, p, self.font.as_ref(), seed, frame.time_s)
            }
            EffectParams::Distort(p) => {
                warp::render_distort(&prep.rgba, prep.distortion_map.as_ref(), p)
            }
            EffectParams::Displace(p) => warp::render_displace(&prep.luma, p),
            EffectParams::Patterns(p) => patterns::render_patterns(&prep.luma, &self.tiles, p),
        }
    }

    /// Text form of a glyph frame, or `None` without a source image.
    pub fn glyph_text(&self, params: &glyph::GlyphParams, frame: FrameInfo) -> Option<String> {
        let prep = self.prepared.as_ref()?;
        let grid = glyph::glyph_grid(&prep.luma, params, self.frame_seed(frame), frame.time_s);
        Some(grid.to_text())
    }

    fn frame_seed(&self, frame: FrameInfo) -> u64 {
        mix_seed(self.seed, &[frame.index])
    }
}

fn prepare(image: &PixelBuffer, ingest: &Ingest) -> FxResult<Prepared> {
    let place = |buf: &PixelBuffer| -> FxResult<PixelBuffer> {
        let placed = resample(buf, ingest.canvas, &ingest.transform)?;
        preprocess(&placed, &ingest.preprocess, ingest.seed)
    };
    let rgba = place(image)?;
    let luma = Plane::luma_of(&rgba);
    let edges = edge::sobel(&luma)?;

    let distortion_map = match &ingest.distortion_map {
        Some(map) if map.same_size(image) => Some(place(map)?),
        Some(map) => {
            return Err(FxError::validation(format!(
                "distortion map is {}x{}, source image is {}x{}",
                map.width(),
                map.height(),
                image.width(),
                image.height()
            )));
        }
        None => None,
    };
    Ok(Prepared {
        rgba,
        luma,
        edges,
        distortion_map,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
