//! Continuous pseudo-random modulation of numeric effect parameters.
//!
//! Parameters opt in through [`Animatable`], which exposes each numeric field under a stable key
//! together with its `[min, max, step]` domain. The [`Animator`] never sees pixels; it only reads
//! and writes these keyed values between frames.

mod animator;

pub use animator::{AnimationSettings, Animator, AnimatorState, smooth_noise};

use crate::effects::palette::DistanceMetric;

/// Declared domain of one animatable parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamDomain {
    /// Stable key, also used in presets and the exclusion set.
    pub key: &'static str,
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
    /// Quantization step.
    pub step: f64,
}

impl ParamDomain {
    /// Declare a domain.
    pub const fn new(key: &'static str, min: f64, max: f64, step: f64) -> Self {
        Self {
            key,
            min,
            max,
            step,
        }
    }

    /// `max - min`.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp into `[min, max]`; NaN maps to `min`.
    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }

    /// Snap to the step grid: whole multiples for `step >= 1`, otherwise decimal precision
    /// `round(1 / step)`.
    pub fn quantize(&self, v: f64) -> f64 {
        if self.step.is_nan() || self.step <= 0.0 {
            return v;
        }
        if self.step >= 1.0 {
            (v / self.step).round() * self.step
        } else {
            let precision = (1.0 / self.step).round();
            (v * precision).round() / precision
        }
    }
}

/// Parameter records whose numeric fields can be driven by the [`Animator`].
pub trait Animatable {
    /// Every animatable field, in a stable order.
    fn domains(&self) -> &'static [ParamDomain];

    /// Current value of `key`, `None` for unknown keys.
    fn get_param(&self, key: &str) -> Option<f64>;

    /// Write `value` into `key`. Returns `false` for unknown keys.
    fn set_param(&mut self, key: &str, value: f64) -> bool;

    /// Domain of `key`, if registered.
    fn domain(&self, key: &str) -> Option<&'static ParamDomain> {
        self.domains().iter().find(|d| d.key == key)
    }
}

/// Conversion between a field's storage type and the animator's `f64` values.
pub(crate) trait ParamValue: Sized {
    fn to_param(&self) -> f64;
    fn from_param(v: f64) -> Self;
}

impl ParamValue for f32 {
    fn to_param(&self) -> f64 {
        f64::from(*self)
    }

    fn from_param(v: f64) -> Self {
        v as f32
    }
}

impl ParamValue for u32 {
    fn to_param(&self) -> f64 {
        f64::from(*self)
    }

    fn from_param(v: f64) -> Self {
        if v.is_nan() {
            0
        } else {
            v.round().clamp(0.0, f64::from(u32::MAX)) as u32
        }
    }
}

impl ParamValue for i32 {
    fn to_param(&self) -> f64 {
        f64::from(*self)
    }

    fn from_param(v: f64) -> Self {
        if v.is_nan() {
            0
        } else {
            v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
        }
    }
}

impl ParamValue for DistanceMetric {
    fn to_param(&self) -> f64 {
        f64::from(self.index())
    }

    fn from_param(v: f64) -> Self {
        DistanceMetric::from_index(v as f32)
    }
}

/// Implement [`Animatable`] for a params struct from a field table.
///
/// Each row is `"key" => field: [min, max, step]`; the field's type must implement `ParamValue`.
macro_rules! animatable {
    ($ty:ty { $($key:literal => $field:ident : [$min:expr, $max:expr, $step:expr]),* $(,)? }) => {
        impl $crate::animation::Animatable for $ty {
            fn domains(&self) -> &'static [$crate::animation::ParamDomain] {
                const DOMAINS: &[$crate::animation::ParamDomain] = &[
                    $($crate::animation::ParamDomain::new(
                        $key,
                        $min as f64,
                        $max as f64,
                        $step as f64,
                    )),*
                ];
                DOMAINS
            }

            fn get_param(&self, key: &str) -> Option<f64> {
                use $crate::animation::ParamValue as _;
                match key {
                    $($key => Some(self.$field.to_param()),)*
                    _ => None,
                }
            }

            fn set_param(&mut self, key: &str, value: f64) -> bool {
                match key {
                    $($key => {
                        self.$field = $crate::animation::ParamValue::from_param(value);
                        true
                    })*
                    _ => false,
                }
            }
        }
    };
}

pub(crate) use animatable;

#[cfg(test)]
#[path = "../tests/unit/animation/domain.rs"]
mod tests;
