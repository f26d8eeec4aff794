//! Error types for SOM training and cluster assignment.

use holdmap_core::CoreError;
use holdmap_math::MathError;
use thiserror::Error;

/// A specialized Result type for SOM operations.
pub type SomResult<T> = Result<T, SomError>;

/// Errors raised while building, training or querying a map.
#[derive(Error, Debug, Clone)]
pub enum SomError {
    /// Training was given no samples.
    #[error("No samples to train on")]
    EmptySamples,

    /// A query was made before the map was trained.
    #[error("Map has not been trained")]
    Untrained,

    /// Training was called on a map that is already frozen.
    #[error("Map is already trained")]
    AlreadyTrained,

    /// Sample dimension differs from the map's.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Map dimension.
        expected: usize,
        /// Sample dimension.
        actual: usize,
    },

    /// A sample contains NaN or infinite values.
    #[error("Invalid sample at row {index}: {reason}")]
    InvalidSample {
        /// Row of the offending sample.
        index: usize,
        /// What was wrong.
        reason: String,
    },

    /// Map parameters are out of range.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },

    /// Too few holders with portfolio vectors to train a map.
    #[error("Insufficient holders: need at least {required}, got {actual}")]
    InsufficientHolders {
        /// Configured minimum.
        required: usize,
        /// Holders available.
        actual: usize,
    },

    /// Numerical error from the math layer.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl SomError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates an invalid sample error.
    #[must_use]
    pub fn invalid_sample(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSample {
            index,
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for SomError {
    fn from(err: CoreError) -> Self {
        Self::invalid_config(err.to_string())
    }
}
