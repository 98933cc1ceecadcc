//! JSON presets: one effect, its source placement and animation settings.

use std::{fs::File, io::BufReader, io::Read, path::Path};

use anyhow::Context as _;

use crate::animation::AnimationSettings;
use crate::effects::EffectParams;
use crate::foundation::core::{Canvas, PixelBuffer};
use crate::foundation::error::{FxError, FxResult};
use crate::preprocess::PreprocessParams;
use crate::render::{DEFAULT_CANVAS_SIZE, Ingest};
use crate::sampler::SourceTransform;

/// Everything needed to render a still or a sequence, minus the pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Longest canvas edge; the source is fit to it.
    pub canvas_size: u32,
    /// Source placement.
    pub transform: SourceTransform,
    /// Preprocessing chain.
    pub preprocess: PreprocessParams,
    /// Effect and its parameters.
    pub effect: EffectParams,
    /// Parameter animation.
    pub animation: AnimationSettings,
    /// Sequence frame rate.
    pub fps: f64,
    /// Sequence length in frames.
    pub frames: u32,
    /// Base seed for grain and per-frame randomness.
    pub seed: u64,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            transform: SourceTransform::default(),
            preprocess: PreprocessParams::default(),
            effect: EffectParams::default(),
            animation: AnimationSettings::default(),
            fps: 30.0,
            frames: 60,
            seed: 0,
        }
    }
}

impl Preset {
    /// Parse a preset from JSON text.
    pub fn from_json_str(s: &str) -> FxResult<Self> {
        serde_json::from_str(s).map_err(|e| FxError::serde(format!("parse preset: {e}")))
    }

    /// Parse a preset from a reader.
    pub fn from_reader(r: impl Read) -> FxResult<Self> {
        serde_json::from_reader(r).map_err(|e| FxError::serde(format!("parse preset: {e}")))
    }

    /// Load and validate a preset file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open preset '{}'", path.display()))?;
        let preset = Self::from_reader(BufReader::new(f))?;
        preset.validate()?;
        tracing::debug!(effect = preset.effect.kind(), "preset loaded");
        Ok(preset)
    }

    /// Reject values no clamp can repair.
    pub fn validate(&self) -> FxResult<()> {
        if self.canvas_size == 0 {
            return Err(FxError::validation("canvas_size must be > 0"));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(FxError::validation("fps must be finite and > 0"));
        }
        self.animation.validate()
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> FxResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FxError::serde(format!("write preset: {e}")))
    }

    /// Engine inputs for an image already fit to [`Preset::canvas_size`]. The canvas takes the
    /// image's size, or is square without an image.
    pub fn ingest(&self, image: Option<PixelBuffer>) -> Ingest {
        let canvas = image
            .as_ref()
            .map_or(Canvas::square(self.canvas_size), Canvas::of);
        Ingest {
            image,
            canvas,
            transform: self.transform,
            preprocess: self.preprocess,
            seed: self.seed,
            ..Ingest::default()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/preset.rs"]
mod tests;
