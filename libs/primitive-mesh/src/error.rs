//! # Mesh Errors
//!
//! Error types for primitive mesh generation.
//!
//! Degenerate directions are never errors: the sweep kernel substitutes a
//! fixed axis instead. Only inputs that cannot describe a shape at all (negative
//! sizes, non-positive sweep angles, malformed combiner data) are rejected.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur during mesh generation.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// A shape parameter is outside the range the builder can represent
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Tessellation settings failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl MeshError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Rejects sizes that are negative, NaN or infinite.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<(), MeshError> {
    if !value.is_finite() || value < 0.0 {
        return Err(MeshError::invalid_argument(format!(
            "{name} must be a non-negative finite number: {value}"
        )));
    }
    Ok(())
}

/// Rejects sizes that are zero, negative, NaN or infinite.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<(), MeshError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MeshError::invalid_argument(format!(
            "{name} must be a positive finite number: {value}"
        )));
    }
    Ok(())
}
