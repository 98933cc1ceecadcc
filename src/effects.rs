//! Effect algorithms and the tagged parameter record that selects one of them.

pub mod automaton;
/// Embossed relief lit from a configurable angle.
pub mod bevel;
pub mod crt;
pub mod dither;
pub mod edge;
pub mod glyph;
pub mod halftone;
/// Generated palettes and nearest-color search.
pub mod palette;
pub mod patterns;
pub mod recolor;
pub mod scatter;
pub mod warp;

use crate::animation::{Animatable, ParamDomain};
use crate::foundation::core::Rgb;
use crate::foundation::error::{FxError, FxResult};

/// Parameters of exactly one effect, tagged by `kind` in serialized form.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectParams {
    /// Dithering and quantization.
    Dither(dither::DitherParams),
    /// Thresholded cellular automaton.
    Automaton(automaton::AutomatonParams),
    /// CRT tube simulation.
    Crt(crt::CrtParams),
    /// Embossed relief.
    Bevel(bevel::BevelParams),
    /// Sobel edge dots.
    Edge(edge::EdgeParams),
    /// Grid halftone: dots, stipple or gradient marks.
    Halftone(halftone::HalftoneParams),
    /// Relaxed random dots.
    Scatter(scatter::ScatterParams),
    /// Gradient recolor.
    Recolor(recolor::RecolorParams),
    /// Character-ramp mapping.
    Glyph(glyph::GlyphParams),
    /// Displacement-map warp.
    Distort(warp::DistortParams),
    /// Brightness-displaced dots.
    Displace(warp::DisplaceParams),
    /// Pattern tiles in dark cells.
    Patterns(patterns::PatternsParams),
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::Dither(dither::DitherParams::default())
    }
}

impl EffectParams {
    /// Every effect kind, in serialized spelling.
    pub const KINDS: &'static [&'static str] = &[
        "dither",
        "automaton",
        "crt",
        "bevel",
        "edge",
        "halftone",
        "scatter",
        "recolor",
        "glyph",
        "distort",
        "displace",
        "patterns",
    ];

    /// Default parameters for a kind name. Matching ignores case, surrounding whitespace and
    /// `-`/`_` separators, and accepts the product's display names (`ascii`, `dots`, ...).
    pub fn defaults_for(kind: &str) -> FxResult<Self> {
        let key = kind.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        Ok(match key.as_str() {
            "dither" | "dithering" => Self::Dither(Default::default()),
            "automaton" | "cellularautomata" => Self::Automaton(Default::default()),
            "crt" => Self::Crt(Default::default()),
            "bevel" => Self::Bevel(Default::default()),
            "edge" => Self::Edge(Default::default()),
            "halftone" | "dots" => Self::Halftone(Default::default()),
            "stippling" => Self::Halftone(halftone::HalftoneParams {
                style: halftone::HalftoneStyle::Stipple,
                min_dot_size: 1.0,
                max_dot_size: 10.0,
                ..Default::default()
            }),
            "gradients" => Self::Halftone(halftone::HalftoneParams {
                style: halftone::HalftoneStyle::Gradient,
                ..Default::default()
            }),
            "scatter" => Self::Scatter(Default::default()),
            "recolor" => Self::Recolor(Default::default()),
            "glyph" | "ascii" => Self::Glyph(Default::default()),
            "distort" => Self::Distort(Default::default()),
            "displace" => Self::Displace(Default::default()),
            "patterns" => Self::Patterns(Default::default()),
            "" => return Err(FxError::validation("effect kind must be non-empty")),
            _ => return Err(FxError::validation(format!("unknown effect kind '{kind}'"))),
        })
    }

    /// Serialized kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dither(_) => "dither",
            Self::Automaton(_) => "automaton",
            Self::Crt(_) => "crt",
            Self::Bevel(_) => "bevel",
            Self::Edge(_) => "edge",
            Self::Halftone(_) => "halftone",
            Self::Scatter(_) => "scatter",
            Self::Recolor(_) => "recolor",
            Self::Glyph(_) => "glyph",
            Self::Distort(_) => "distort",
            Self::Displace(_) => "displace",
            Self::Patterns(_) => "patterns",
        }
    }

    /// Color of a canvas with nothing drawn on it.
    pub fn background(&self) -> Rgb {
        match self {
            Self::Dither(p) => p.bg,
            Self::Automaton(p) => p.bg,
            Self::Bevel(p) => p.bg,
            Self::Edge(p) => p.bg,
            Self::Halftone(p) => p.bg,
            Self::Scatter(p) => p.bg,
            Self::Glyph(p) => p.bg,
            Self::Displace(p) => p.bg,
            Self::Patterns(p) => p.bg,
            Self::Distort(p) => p.bg,
            Self::Crt(_) => Rgb::new(20, 20, 20),
            Self::Recolor(_) => Rgb::WHITE,
        }
    }

    fn inner(&self) -> &dyn Animatable {
        match self {
            Self::Dither(p) => p,
            Self::Automaton(p) => p,
            Self::Crt(p) => p,
            Self::Bevel(p) => p,
            Self::Edge(p) => p,
            Self::Halftone(p) => p,
            Self::Scatter(p) => p,
            Self::Recolor(p) => p,
            Self::Glyph(p) => p,
            Self::Distort(p) => p,
            Self::Displace(p) => p,
            Self::Patterns(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Animatable {
        match self {
            Self::Dither(p) => p,
            Self::Automaton(p) => p,
            Self::Crt(p) => p,
            Self::Bevel(p) => p,
            Self::Edge(p) => p,
            Self::Halftone(p) => p,
            Self::Scatter(p) => p,
            Self::Recolor(p) => p,
            Self::Glyph(p) => p,
            Self::Distort(p) => p,
            Self::Displace(p) => p,
            Self::Patterns(p) => p,
        }
    }
}

impl Animatable for EffectParams {
    fn domains(&self) -> &'static [ParamDomain] {
        self.inner().domains()
    }

    fn get_param(&self, key: &str) -> Option<f64> {
        self.inner().get_param(key)
    }

    fn set_param(&mut self, key: &str, value: f64) -> bool {
        self.inner_mut().set_param(key, value)
    }
}

#[cfg(test)]
#[path = "../tests/unit/effects/params.rs"]
mod tests;
