use std::collections::{BTreeMap, BTreeSet};

use crate::animation::{Animatable, ParamDomain};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::Rng64;

/// Layered-sine noise in roughly `[-1, 1]`, smooth in `t` and decorrelated by `seed`.
pub fn smooth_noise(t: f64, seed: f64) -> f64 {
    ((t + seed * 100.0).sin() * 0.5
        + (t * 2.3 + seed * 47.0).sin() * 0.25
        + (t * 4.1 + seed * 23.0).sin() * 0.125)
        / 0.875
}

/// Global animation knobs, as stored in presets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Start in the animating state.
    pub enabled: bool,
    /// Clock multiplier, `0.05..=2`.
    pub speed: f64,
    /// How fast the noise evolves, `0..=1`.
    pub randomness: f64,
    /// Fraction of each domain the noise may cover, `0.01..=1`.
    pub intensity: f64,
    /// Keys left untouched while animating.
    pub excluded: BTreeSet<String>,
    /// Seed for the phase-seed stream.
    pub seed: u64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 0.5,
            randomness: 0.5,
            intensity: 0.5,
            excluded: BTreeSet::new(),
            seed: 0,
        }
    }
}

impl AnimationSettings {
    /// Reject non-finite knobs. In-range clamping happens in the [`Animator`] setters.
    pub fn validate(&self) -> FxResult<()> {
        for (name, v) in [
            ("speed", self.speed),
            ("randomness", self.randomness),
            ("intensity", self.intensity),
        ] {
            if !v.is_finite() {
                return Err(FxError::animation(format!("{name} must be finite, got {v}")));
            }
        }
        Ok(())
    }
}

/// Animator lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// Parameters hold their manual values.
    Idle,
    /// Every tick rewrites non-excluded parameters around their baselines.
    Animating,
}

#[derive(Clone, Debug)]
struct Track {
    seed: f64,
    baseline: f64,
    last_set: Option<f64>,
}

/// Drives keyed parameters with smooth noise around captured baselines.
///
/// Ownership of the parameter record stays with the host: every call borrows it, so a render
/// thread can take a plain clone as its frame snapshot.
#[derive(Clone, Debug)]
pub struct Animator {
    state: AnimatorState,
    speed: f64,
    randomness: f64,
    intensity: f64,
    excluded: BTreeSet<String>,
    time: f64,
    rng: Rng64,
    tracks: BTreeMap<&'static str, Track>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(&AnimationSettings::default())
    }
}

impl Animator {
    /// Idle animator configured from `settings`. `settings.enabled` is left for the caller to act
    /// on, since enabling needs the parameter record.
    pub fn new(settings: &AnimationSettings) -> Self {
        let mut a = Self {
            state: AnimatorState::Idle,
            speed: 0.5,
            randomness: 0.5,
            intensity: 0.5,
            excluded: settings.excluded.clone(),
            time: 0.0,
            rng: Rng64::new(settings.seed),
            tracks: BTreeMap::new(),
        };
        a.set_speed(settings.speed);
        a.set_randomness(settings.randomness);
        a.set_intensity(settings.intensity);
        a
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Return `true` while animating.
    pub fn is_animating(&self) -> bool {
        self.state == AnimatorState::Animating
    }

    /// Simulated time since the last `enable`.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current clock multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current noise evolution rate.
    pub fn randomness(&self) -> f64 {
        self.randomness
    }

    /// Current modulation depth.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Set the clock multiplier, clamped to `0.05..=2`.
    pub fn set_speed(&mut self, v: f64) {
        self.speed = clamp_or(v, 0.05, 2.0, 0.5);
    }

    /// Set the noise evolution rate, clamped to `0..=1`.
    pub fn set_randomness(&mut self, v: f64) {
        self.randomness = clamp_or(v, 0.0, 1.0, 0.5);
    }

    /// Set the modulation depth, clamped to `0.01..=1`.
    pub fn set_intensity(&mut self, v: f64) {
        self.intensity = clamp_or(v, 0.01, 1.0, 0.5);
    }

    /// Stop modulating `key`; it keeps whatever value it has now.
    pub fn exclude(&mut self, key: &str) {
        self.excluded.insert(key.to_owned());
    }

    /// Resume modulating `key`.
    pub fn include(&mut self, key: &str) {
        self.excluded.remove(key);
    }

    /// Flip the exclusion of `key`; returns `true` if it is now excluded.
    pub fn toggle_excluded(&mut self, key: &str) -> bool {
        if self.excluded.remove(key) {
            false
        } else {
            self.excluded.insert(key.to_owned());
            true
        }
    }

    /// Return `true` if `key` is excluded.
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    /// Baseline currently held for `key`, if a track exists.
    pub fn baseline(&self, key: &str) -> Option<f64> {
        self.tracks.get(key).map(|t| t.baseline)
    }

    /// Idle -> Animating: capture every registered value as its baseline, draw fresh phase
    /// seeds and reset the clock. No-op while already animating.
    #[tracing::instrument(skip_all)]
    pub fn enable(&mut self, params: &dyn Animatable) {
        if self.is_animating() {
            tracing::debug!("enable ignored: already animating");
            return;
        }
        self.tracks.clear();
        for d in params.domains() {
            if let Some(value) = params.get_param(d.key) {
                let seed = self.draw_seed();
                self.tracks.insert(
                    d.key,
                    Track {
                        seed,
                        baseline: value,
                        last_set: None,
                    },
                );
            }
        }
        self.time = 0.0;
        self.state = AnimatorState::Animating;
        tracing::debug!(params = self.tracks.len(), "animation enabled");
    }

    /// Animating -> Idle: write every baseline back before returning.
    #[tracing::instrument(skip_all)]
    pub fn disable(&mut self, params: &mut dyn Animatable) {
        if !self.is_animating() {
            return;
        }
        for (key, track) in &self.tracks {
            params.set_param(key, track.baseline);
        }
        self.tracks.clear();
        self.state = AnimatorState::Idle;
        tracing::debug!("animation disabled, baselines restored");
    }

    /// Redraw every phase seed. Baselines and state are kept.
    #[tracing::instrument(skip_all)]
    pub fn reseed(&mut self) {
        let keys: Vec<&'static str> = self.tracks.keys().copied().collect();
        for key in keys {
            let seed = self.draw_seed();
            if let Some(t) = self.tracks.get_mut(key) {
                t.seed = seed;
            }
        }
    }

    /// Advance the clock by `dt` seconds and rewrite every non-excluded parameter.
    ///
    /// A value that differs from what the previous tick wrote is treated as a manual edit and
    /// becomes the new baseline. Keys registered after `enable` (for example after the host
    /// switched effects) get a track on first sight.
    pub fn tick(&mut self, dt: f64, params: &mut dyn Animatable) {
        if !self.is_animating() {
            return;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.time += dt * self.speed * 2.0;
        let t = self.time * (0.5 + self.randomness * 1.5);

        for d in params.domains() {
            if self.excluded.contains(d.key) {
                continue;
            }
            let Some(current) = params.get_param(d.key) else {
                continue;
            };
            if !self.tracks.contains_key(d.key) {
                let seed = self.draw_seed();
                self.tracks.insert(
                    d.key,
                    Track {
                        seed,
                        baseline: current,
                        last_set: None,
                    },
                );
            }
            let Some(track) = self.tracks.get_mut(d.key) else {
                continue;
            };
            if track.last_set.is_some_and(|last| last != current) {
                track.baseline = current;
            }
            let value = modulate(d, track.baseline, smooth_noise(t, track.seed), self.intensity);
            params.set_param(d.key, value);
            // Read back so storage rounding is not mistaken for a manual edit next tick.
            track.last_set = params.get_param(d.key);
        }
    }

    fn draw_seed(&mut self) -> f64 {
        self.rng.next_f64_01() * 1000.0
    }
}

/// `baseline + noise * range * intensity / 2`, clamped to the domain and snapped to its step.
fn modulate(d: &ParamDomain, baseline: f64, noise: f64, intensity: f64) -> f64 {
    let v = d.clamp(baseline + noise * d.range() * intensity * 0.5);
    d.quantize(v)
}

fn clamp_or(v: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(min, max) } else { fallback }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
