//! Error types for product vectorization.

use holdmap_core::EmbeddingMethod;
use holdmap_math::MathError;
use thiserror::Error;

/// A specialized Result type for vectorization.
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Errors that can occur while vectorizing products.
#[derive(Error, Debug, Clone)]
pub enum EmbedError {
    /// No products were supplied.
    #[error("No products provided for embedding generation")]
    EmptyBatch,

    /// Tokenization left no terms to build a vocabulary from.
    #[error("Empty vocabulary for {method} embedding")]
    EmptyVocabulary {
        /// Method that needed the vocabulary.
        method: EmbeddingMethod,
    },

    /// The method is not compiled into this build.
    #[error("Embedding method {method} is not available in this build")]
    Unavailable {
        /// The unavailable method.
        method: EmbeddingMethod,
    },

    /// A numerical routine failed.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl EmbedError {
    /// Creates an empty vocabulary error.
    #[must_use]
    pub fn empty_vocabulary(method: EmbeddingMethod) -> Self {
        Self::EmptyVocabulary { method }
    }

    /// Creates an unavailable method error.
    #[must_use]
    pub fn unavailable(method: EmbeddingMethod) -> Self {
        Self::Unavailable { method }
    }
}
