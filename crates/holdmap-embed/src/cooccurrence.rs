//! Co-occurrence factorization product vectors.
//!
//! A symmetric distance-weighted co-occurrence matrix over the sorted token
//! vocabulary is factorized with SVD; token vectors are `U[:, :k] * sqrt(s)`
//! and a product is the mean of its token vectors.

use std::collections::BTreeMap;

use holdmap_core::{EmbeddingMethod, ProductRecord};
use holdmap_math::linear_algebra::truncated_svd;
use nalgebra::DMatrix;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batch::{BatchMetadata, EmbeddingBatch};
use crate::error::{EmbedError, EmbedResult};
use crate::registry::ProductVectorizer;
use crate::text::TieredTokenizer;

/// Factorization settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceConfig {
    /// Context tokens on each side.
    pub window: usize,
    /// Upper bound on the vector dimension.
    pub max_dimension: usize,
    /// Added to every cell before factorization.
    pub regularization: f64,
}

impl Default for CooccurrenceConfig {
    fn default() -> Self {
        Self {
            window: 5,
            max_dimension: 50,
            regularization: 1e-6,
        }
    }
}

impl CooccurrenceConfig {
    /// Vector dimension for a vocabulary of `vocab` tokens.
    #[must_use]
    pub fn dimension_for(&self, vocab: usize) -> usize {
        self.max_dimension.min(vocab.saturating_sub(1)).max(1)
    }
}

/// The co-occurrence vectorizer.
#[derive(Debug, Default)]
pub struct CooccurrenceVectorizer {
    config: CooccurrenceConfig,
    tokenizer: TieredTokenizer,
}

impl CooccurrenceVectorizer {
    /// Creates a vectorizer with custom settings.
    #[must_use]
    pub fn new(config: CooccurrenceConfig) -> Self {
        Self {
            config,
            tokenizer: TieredTokenizer::default(),
        }
    }

    /// Replaces the tokenizer tiers.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: TieredTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    fn counts(&self, encoded: &[Vec<usize>], vocab: usize) -> DMatrix<f64> {
        let mut counts = DMatrix::from_element(vocab, vocab, self.config.regularization);
        for doc in encoded {
            for (i, &word) in doc.iter().enumerate() {
                let start = i.saturating_sub(self.config.window);
                let end = (i + self.config.window + 1).min(doc.len());
                for (j, &context) in doc.iter().enumerate().take(end).skip(start) {
                    if i != j {
                        counts[(word, context)] += 1.0 / i.abs_diff(j) as f64;
                    }
                }
            }
        }
        counts
    }
}

impl ProductVectorizer for CooccurrenceVectorizer {
    fn method(&self) -> EmbeddingMethod {
        EmbeddingMethod::Cooccurrence
    }

    fn vectorize(&self, products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch> {
        if products.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }

        let documents: Vec<Vec<String>> = products
            .iter()
            .map(|p| self.tokenizer.product_tokens(p))
            .collect();
        let vocabulary: BTreeMap<&str, usize> = {
            let mut words: Vec<&str> = documents.iter().flatten().map(String::as_str).collect();
            words.sort_unstable();
            words.dedup();
            words.into_iter().enumerate().map(|(i, w)| (w, i)).collect()
        };
        if vocabulary.is_empty() {
            return Err(EmbedError::empty_vocabulary(EmbeddingMethod::Cooccurrence));
        }

        let encoded: Vec<Vec<usize>> = documents
            .iter()
            .map(|doc| doc.iter().filter_map(|t| vocabulary.get(t.as_str()).copied()).collect())
            .collect();

        let vocab = vocabulary.len();
        let k = self.config.dimension_for(vocab);
        let svd = truncated_svd(&self.counts(&encoded, vocab), k)?;
        let tokens = svd.scaled_rows();
        let dim = tokens.ncols();

        let mut matrix = Array2::<f64>::zeros((products.len(), dim));
        for (mut row, doc) in matrix.outer_iter_mut().zip(&encoded) {
            if doc.is_empty() {
                continue;
            }
            for &t in doc {
                for (d, x) in row.iter_mut().enumerate() {
                    *x += tokens[(t, d)];
                }
            }
            row /= doc.len() as f64;
        }

        debug!(
            products = products.len(),
            vocabulary = vocab,
            dimension = dim,
            "Generated co-occurrence embeddings"
        );

        Ok(EmbeddingBatch {
            method: EmbeddingMethod::Cooccurrence,
            product_ids: products.iter().map(|p| p.id).collect(),
            matrix,
            metadata: BatchMetadata {
                feature_names: Vec::new(),
                vocabulary_size: vocab,
                tokenizer: Some(self.tokenizer.active().name().to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn products() -> Vec<ProductRecord> {
        vec![
            ProductRecord::builder(1, "Apple Inc").sector("Technology").build(),
            ProductRecord::builder(2, "Microsoft Corp").sector("Technology").build(),
            ProductRecord::new(3, "the"),
        ]
    }

    #[test]
    fn test_dimension_rule() {
        let config = CooccurrenceConfig::default();
        assert_eq!(config.dimension_for(1), 1);
        assert_eq!(config.dimension_for(2), 1);
        assert_eq!(config.dimension_for(10), 9);
        assert_eq!(config.dimension_for(500), 50);
    }

    #[test]
    fn test_counts_are_symmetric_and_distance_weighted() {
        let v = CooccurrenceVectorizer::default();
        let counts = v.counts(&[vec![0, 1, 2]], 3);
        assert_relative_eq!(counts[(0, 1)], 1.0 + 1e-6);
        assert_relative_eq!(counts[(0, 2)], 0.5 + 1e-6);
        assert_relative_eq!(counts[(0, 2)], counts[(2, 0)]);
        assert_relative_eq!(counts[(1, 1)], 1e-6);
    }

    struct NoPattern;

    impl crate::text::Tokenize for NoPattern {
        fn name(&self) -> &'static str {
            "no_pattern"
        }
        fn available(&self) -> bool {
            false
        }
        fn tokenize(&self, _text: &str) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_unavailable_primary_uses_fallback() {
        let tokenizer = TieredTokenizer::new(Box::new(NoPattern), Box::new(crate::text::SimpleTokenizer));
        let batch = CooccurrenceVectorizer::default()
            .with_tokenizer(tokenizer)
            .vectorize(&products())
            .unwrap();
        assert_eq!(batch.metadata.tokenizer.as_deref(), Some("simple"));
        // the fallback keeps stop-words, so "the" joins the vocabulary
        assert_eq!(batch.metadata.vocabulary_size, 6);
    }

    #[test]
    fn test_shape_and_zero_rows() {
        let batch = CooccurrenceVectorizer::default().vectorize(&products()).unwrap();
        // vocabulary: apple, corp, inc, microsoft, technology
        assert_eq!(batch.metadata.vocabulary_size, 5);
        assert_eq!(batch.matrix.dim(), (3, 4));
        assert!(batch.matrix.row(2).iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let a = CooccurrenceVectorizer::default().vectorize(&products()).unwrap();
        let b = CooccurrenceVectorizer::default().vectorize(&products()).unwrap();
        assert_eq!(a.matrix, b.matrix);
    }

    #[test]
    fn test_empty_vocabulary() {
        assert!(matches!(
            CooccurrenceVectorizer::default().vectorize(&[ProductRecord::new(1, "")]),
            Err(EmbedError::EmptyVocabulary { .. })
        ));
    }
}
