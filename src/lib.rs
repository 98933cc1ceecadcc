//! rasterfx is a deterministic image-to-image effect engine.
//!
//! A host hands decoded RGBA pixels to an [`Engine`] once per structural change and then asks
//! for frames:
//!
//! - Build an [`Ingest`] (source image, canvas, placement, preprocessing, seed)
//! - Call [`Engine::reconfigure`] to place, preprocess and cache derived planes
//! - Call [`Engine::render`] with an [`EffectParams`] snapshot and a [`FrameInfo`]
//!
//! An [`Animator`] can modulate any numeric parameter between frames through the [`Animatable`]
//! trait. Presets bundle all of the above as JSON ([`Preset`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod animation;
pub mod assets;
pub mod config;
pub mod effects;
pub mod preprocess;
pub mod render;
pub mod sampler;

pub use crate::animation::{
    Animatable, AnimationSettings, Animator, AnimatorState, ParamDomain, smooth_noise,
};
pub use crate::assets::GlyphFont;
pub use crate::config::Preset;
pub use crate::effects::EffectParams;
pub use crate::foundation::core::{Canvas, FrameInfo, PixelBuffer, Plane, Rgb};
pub use crate::foundation::error::{FxError, FxResult};
pub use crate::foundation::math::luma;
pub use crate::preprocess::{PreprocessParams, preprocess};
pub use crate::render::{DEFAULT_CANVAS_SIZE, Engine, Ingest};
pub use crate::sampler::{Sampler, SourceTransform, resample};
