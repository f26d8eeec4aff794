//! Hashed categorical plus numeric product vectors.
//!
//! Each categorical value is hashed with 64-bit FNV-1a and reduced modulo
//! [`HASH_BUCKETS`]; numeric attributes follow, optionally standardized
//! across the batch.

use holdmap_core::{EmbeddingMethod, ProductRecord};
use holdmap_math::Standardizer;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batch::{BatchMetadata, EmbeddingBatch};
use crate::error::{EmbedError, EmbedResult};
use crate::registry::ProductVectorizer;

/// Bucket count for categorical hashing.
pub const HASH_BUCKETS: u64 = 1000;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// How numeric columns are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HybridScaling {
    /// Zero mean and unit population variance per numeric column.
    #[default]
    Standardized,

    /// Numeric values as stored.
    Raw,
}

/// 64-bit FNV-1a.
#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Stable bucket for a categorical value.
#[must_use]
pub fn category_bucket(value: &str) -> f64 {
    (fnv1a(value.as_bytes()) % HASH_BUCKETS) as f64
}

/// The hybrid vectorizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridVectorizer {
    scaling: HybridScaling,
}

impl HybridVectorizer {
    /// Creates a vectorizer with the given numeric scaling.
    #[must_use]
    pub fn new(scaling: HybridScaling) -> Self {
        Self { scaling }
    }

    /// Numeric scaling in use.
    #[must_use]
    pub fn scaling(&self) -> HybridScaling {
        self.scaling
    }
}

impl ProductVectorizer for HybridVectorizer {
    fn method(&self) -> EmbeddingMethod {
        EmbeddingMethod::Hybrid
    }

    fn vectorize(&self, products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch> {
        let Some(first) = products.first() else {
            return Err(EmbedError::EmptyBatch);
        };

        let mut feature_names: Vec<String> = first
            .categorical_features()
            .keys()
            .map(|k| (*k).to_string())
            .collect();
        let n_cat = feature_names.len();
        feature_names.extend(first.numerical_features().keys().map(|k| (*k).to_string()));
        let dim = feature_names.len();

        let mut matrix = Array2::zeros((products.len(), dim));
        for (mut row, product) in matrix.outer_iter_mut().zip(products) {
            let categorical = product.categorical_features();
            let numerical = product.numerical_features();
            let values = categorical
                .values()
                .map(|v| category_bucket(v))
                .chain(numerical.values().copied());
            for (cell, value) in row.iter_mut().zip(values) {
                *cell = value;
            }
        }

        if self.scaling == HybridScaling::Standardized && dim > n_cat {
            let numeric = matrix.slice(s![.., n_cat..]).to_owned();
            let (_, scaled) = Standardizer::fit_transform(&numeric)?;
            matrix.slice_mut(s![.., n_cat..]).assign(&scaled);
        }

        debug!(
            products = products.len(),
            dimension = dim,
            scaling = ?self.scaling,
            "Generated hybrid embeddings"
        );

        Ok(EmbeddingBatch {
            method: EmbeddingMethod::Hybrid,
            product_ids: products.iter().map(|p| p.id).collect(),
            matrix,
            metadata: BatchMetadata {
                feature_names,
                vocabulary_size: 0,
                tokenizer: None,
            },
        })
    }
}
