//! Error types for the AC circuit solver.
//!
//! This module provides a unified error type [`LinsimError`] that covers
//! every failure mode that can occur during circuit construction, MNA
//! assembly, and frequency-sweep analysis.

use thiserror::Error;

/// Result type alias using [`LinsimError`].
pub type Result<T> = std::result::Result<T, LinsimError>;

/// Unified error type for all circuit-build and analysis operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinsimError {
    /// A requested source or sink name does not exist in the circuit.
    #[error("unknown element '{name}'")]
    UnknownElement { name: String },

    /// A component or node name collided with an existing one at build time.
    #[error("duplicate name '{name}'")]
    DuplicateName { name: String },

    /// The frequency vector is empty or not strictly monotonically increasing.
    #[error("dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    /// Factorisation failed at a specific frequency.
    #[error("singular matrix at f = {frequency} Hz")]
    Singular { frequency: f64 },

    /// A component parameter is invalid (non-positive R/C/L, malformed
    /// op-amp parameters, unknown input type, etc).
    #[error("invalid parameter for '{component}': {message}")]
    InvalidParameter { component: String, message: String },

    /// A cooperative cancel was observed mid-sweep. No solution is returned.
    #[error("analysis cancelled")]
    Cancelled,
}

impl LinsimError {
    /// Create an unknown-element error.
    pub fn unknown_element(name: impl Into<String>) -> Self {
        Self::UnknownElement { name: name.into() }
    }

    /// Create a duplicate-name error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create a dimension-mismatch error.
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
        }
    }

    /// Create an invalid-parameter error.
    pub fn invalid_parameter(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            message: message.into(),
        }
    }
}
