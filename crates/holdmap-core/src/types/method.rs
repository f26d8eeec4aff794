//! Embedding method selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Strategy used to turn product metadata into a fixed-dimension vector.
///
/// Legacy method names from earlier storage schemas are accepted on
/// deserialization and by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMethod {
    /// Hashed categorical attributes concatenated with numeric attributes.
    #[default]
    #[serde(alias = "custom_financial")]
    Hybrid,

    /// TF-IDF weights over a bounded vocabulary.
    #[serde(alias = "tfidf_basic")]
    FrequencyText,

    /// Learned token vectors (skip-gram), averaged per product.
    #[serde(alias = "word2vec")]
    Distributional,

    /// SVD of a distance-weighted token co-occurrence matrix.
    #[serde(alias = "glove")]
    Cooccurrence,
}

impl EmbeddingMethod {
    /// All methods, in registry order.
    pub const ALL: [EmbeddingMethod; 4] = [
        Self::Hybrid,
        Self::FrequencyText,
        Self::Distributional,
        Self::Cooccurrence,
    ];

    /// Storage code for product embedding rows.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::FrequencyText => "frequency_text",
            Self::Distributional => "distributional",
            Self::Cooccurrence => "cooccurrence",
        }
    }

    /// Storage code for portfolio embedding rows derived from this method.
    #[must_use]
    pub fn portfolio_label(&self) -> String {
        format!("{}_weighted", self.code())
    }

    /// Returns true if the method tokenizes product text.
    #[must_use]
    pub fn is_text_based(&self) -> bool {
        !matches!(self, Self::Hybrid)
    }
}

impl fmt::Display for EmbeddingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for EmbeddingMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" | "custom_financial" => Ok(Self::Hybrid),
            "frequency_text" | "tfidf_basic" => Ok(Self::FrequencyText),
            "distributional" | "word2vec" => Ok(Self::Distributional),
            "cooccurrence" | "glove" => Ok(Self::Cooccurrence),
            other => Err(CoreError::invalid_config(
                "embedding_method",
                format!("unknown method '{other}'"),
            )),
        }
    }
}
