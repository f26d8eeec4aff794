//! Embedding rows exchanged with the storage layer.
//!
//! Both row types are keyed by `(entity, method)` and are replaced wholesale
//! when regenerated; nothing in the pipeline mutates them in place.

use serde::{Deserialize, Serialize};

use super::EmbeddingMethod;
use crate::ids::{HolderId, ProductId};

/// One product's vector under one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEmbedding {
    /// Product this row belongs to.
    pub product_id: ProductId,

    /// Method that produced the vector.
    pub method: EmbeddingMethod,

    /// The vector itself.
    pub vector: Vec<f64>,

    /// Names of the features (or vocabulary terms) behind each dimension,
    /// when the method has interpretable dimensions.
    pub feature_list: Vec<String>,
}

impl ProductEmbedding {
    /// Vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Returns true if every component is zero (or NaN, which reads as zero).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        is_zero_vector(&self.vector)
    }
}

/// Returns true if every component is zero once NaN is read as zero.
#[must_use]
pub fn is_zero_vector(vector: &[f64]) -> bool {
    vector.iter().all(|x| x.is_nan() || *x == 0.0)
}

/// Bookkeeping attached to a portfolio embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioMetadata {
    /// Product method the portfolio was aggregated from.
    pub base_method: EmbeddingMethod,

    /// Aggregation rule label.
    pub aggregation: String,

    /// Holdings dropped as containers of other holdings.
    pub parents_skipped: usize,

    /// Holdings whose unresolved value was replaced by the default estimate.
    pub defaulted_values: usize,

    /// Holdings skipped because their product had no embedding.
    pub missing_embeddings: usize,

    /// Holdings skipped because their embedding was all zeros.
    pub zero_embeddings: usize,
}

/// One holder's value-weighted portfolio vector under one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEmbedding {
    /// Holder this row belongs to.
    pub holder_id: HolderId,

    /// Storage label, e.g. `hybrid_weighted`.
    pub method: String,

    /// Weighted-average vector.
    pub vector: Vec<f64>,

    /// Holdings that contributed to the vector.
    pub asset_count: usize,

    /// Sum of the contributing holdings' estimated values.
    pub total_value: f64,

    /// Aggregation bookkeeping.
    pub metadata: PortfolioMetadata,
}

impl PortfolioEmbedding {
    /// Vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
