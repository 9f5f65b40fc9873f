//! Configuration errors.
//!
//! Only construction paths return these. Once a simulation is running,
//! every recoverable condition is handled in place and at most logged.

use thiserror::Error;

use crate::enums::AbilityKind;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pool `{pool}` has no factory configured")]
    MissingFactory { pool: &'static str },

    #[error("ability table has no entry for {kind:?}")]
    MissingAbility { kind: AbilityKind },

    #[error("unknown ability key `{key}`")]
    UnknownAbility { key: String },

    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be in {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),

    #[error("save blob `{key}` is corrupt")]
    CorruptSave {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Check that `value` is finite and strictly positive.
pub fn ensure_positive(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Check that `value` is finite and not negative.
pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
