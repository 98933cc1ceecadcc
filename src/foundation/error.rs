/// Result alias used across the crate.
pub type FxResult<T> = Result<T, FxError>;

/// Error type for engine, effect and configuration failures.
///
/// Only malformed input surfaces as an error. Out-of-domain parameters are clamped by the
/// effects themselves and never reach this type.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Input buffers or configuration values that cannot be processed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Misuse of the parameter animation state machine.
    #[error("animation error: {0}")]
    Animation(String),

    /// Failures while producing an output frame.
    #[error("render error: {0}")]
    Render(String),

    /// Preset (de)serialization failures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually IO or image codec errors with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`FxError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FxError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
