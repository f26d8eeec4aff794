//! Vectorizer output.

use holdmap_core::{EmbeddingMethod, ProductEmbedding, ProductId};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Descriptive data about a generated batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    /// Column names when dimensions are interpretable (hybrid features,
    /// frequency-text vocabulary); empty for learned dimensions.
    pub feature_names: Vec<String>,

    /// Distinct tokens or terms seen; zero for hybrid.
    pub vocabulary_size: usize,

    /// Tokenizer tier that ran, for text-based methods.
    pub tokenizer: Option<String>,
}

/// One row per input product, in input order.
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
    /// Method that produced the matrix.
    pub method: EmbeddingMethod,

    /// Product of each row.
    pub product_ids: Vec<ProductId>,

    /// Products x dimension.
    pub matrix: Array2<f64>,

    /// Batch description.
    pub metadata: BatchMetadata,
}

impl EmbeddingBatch {
    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    /// Returns true if the batch has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    /// Vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.matrix.ncols()
    }

    /// Splits the matrix into storage rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<ProductEmbedding> {
        let Self {
            method,
            product_ids,
            matrix,
            metadata,
        } = self;
        product_ids
            .into_iter()
            .zip(matrix.outer_iter())
            .map(|(product_id, row)| ProductEmbedding {
                product_id,
                method,
                vector: row.to_vec(),
                feature_list: metadata.feature_names.clone(),
            })
            .collect()
    }
}
