//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone)]
pub enum MathError {
    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Vector or column dimensions disagree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the operation was set up for.
        expected: usize,
        /// Dimension that was supplied.
        actual: usize,
    },

    /// A matrix decomposition did not produce the requested factors.
    #[error("Decomposition failed: {reason}")]
    DecompositionFailed {
        /// What went wrong.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a decomposition failure.
    #[must_use]
    pub fn decomposition_failed(reason: impl Into<String>) -> Self {
        Self::DecompositionFailed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::dimension_mismatch(4, 3);
        assert!(err.to_string().contains("expected 4"));

        let err = MathError::insufficient_data(2, 0);
        assert_eq!(err.to_string(), "Insufficient data: need at least 2, got 0");
    }
}
