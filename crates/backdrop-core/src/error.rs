use thiserror::Error;

/// Errors raised while building or validating a [`crate::SceneConfig`].
///
/// The render pipeline itself never fails; configuration is the only place
/// where bad input is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("{field} out of range: {reason}")]
    InvalidRange {
        field: &'static str,
        reason: &'static str,
    },

    #[error("unknown preset '{0}' (expected moody, cosmic, neon, vibrant or nebula)")]
    UnknownPreset(String),

    #[error("invalid color '{0}' (expected #rrggbb)")]
    InvalidColor(String),

    #[error("light position must not be the zero vector")]
    DegenerateLight,

    #[error("malformed scene config: {0}")]
    Json(#[from] serde_json::Error),
}
