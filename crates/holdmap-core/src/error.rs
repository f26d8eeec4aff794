//! Error types for the Holdmap core crate.
//!
//! Configuration loading and validation are the only fallible operations
//! at this layer; each downstream crate defines its own error enum.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration document could not be parsed.
    #[error("Configuration parse error: {reason}")]
    ConfigParse {
        /// Parser message.
        reason: String,
    },

    /// Reading a configuration file failed.
    #[error("IO error reading {path}: {reason}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO message.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration parse error.
    #[must_use]
    pub fn config_parse(reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            reason: reason.into(),
        }
    }
}
