//! Distributional (skip-gram) product vectors.
//!
//! Token vectors are learned with skip-gram and negative sampling over the
//! whole product corpus; a product's vector is the mean of its token
//! vectors, or zeros when it has no tokens. Training uses a seeded ChaCha
//! generator, so a fixed seed and product order give identical output.
//!
//! Requires the `distributional` feature. Without it the vectorizer reports
//! itself unavailable.

use holdmap_core::{EmbeddingMethod, ProductRecord};
use serde::{Deserialize, Serialize};

use crate::batch::EmbeddingBatch;
use crate::error::EmbedResult;
use crate::registry::ProductVectorizer;
use crate::text::TieredTokenizer;

/// Skip-gram hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionalConfig {
    /// Vector dimension.
    pub dimension: usize,
    /// Context tokens on each side.
    pub window: usize,
    /// Negative samples per positive pair.
    pub negatives: usize,
    /// Passes over the corpus.
    pub epochs: usize,
    /// Learning rate at the first step.
    pub initial_learning_rate: f64,
    /// Learning rate floor at the last step.
    pub min_learning_rate: f64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for DistributionalConfig {
    fn default() -> Self {
        Self {
            dimension: 50,
            window: 3,
            negatives: 5,
            epochs: 5,
            initial_learning_rate: 0.025,
            min_learning_rate: 0.0001,
            seed: 42,
        }
    }
}

/// The distributional vectorizer.
#[derive(Debug, Default)]
pub struct DistributionalVectorizer {
    config: DistributionalConfig,
    tokenizer: TieredTokenizer,
}

impl DistributionalVectorizer {
    /// Creates a vectorizer with custom hyperparameters.
    #[must_use]
    pub fn new(config: DistributionalConfig) -> Self {
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

    /// Hyperparameters in use.
    #[must_use]
    pub fn config(&self) -> &DistributionalConfig {
        &self.config
    }
}

impl ProductVectorizer for DistributionalVectorizer {
    fn method(&self) -> EmbeddingMethod {
        EmbeddingMethod::Distributional
    }

    fn available(&self) -> bool {
        cfg!(feature = "distributional")
    }

    #[cfg(feature = "distributional")]
    fn vectorize(&self, products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch> {
        skipgram::vectorize(&self.config, &self.tokenizer, products)
    }

    #[cfg(not(feature = "distributional"))]
    fn vectorize(&self, _products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch> {
        Err(crate::error::EmbedError::unavailable(EmbeddingMethod::Distributional))
    }
}

#[cfg(feature = "distributional")]
mod skipgram {
    use std::collections::BTreeMap;

    use holdmap_core::{EmbeddingMethod, ProductRecord};
    use ndarray::{Array2, Axis};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use tracing::debug;

    use super::DistributionalConfig;
    use crate::batch::{BatchMetadata, EmbeddingBatch};
    use crate::error::{EmbedError, EmbedResult};
    use crate::text::TieredTokenizer;

    const UNIGRAM_POWER: f64 = 0.75;

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Cumulative unigram^0.75 distribution for negative draws.
    fn negative_table(counts: &[usize]) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(counts.len());
        let mut total = 0.0;
        for &c in counts {
            total += (c as f64).powf(UNIGRAM_POWER);
            cumulative.push(total);
        }
        if total > 0.0 {
            cumulative.iter_mut().for_each(|x| *x /= total);
        }
        cumulative
    }

    fn draw(table: &[f64], rng: &mut ChaCha20Rng) -> usize {
        let r: f64 = rng.gen();
        table.partition_point(|&c| c < r).min(table.len() - 1)
    }

    pub(super) fn vectorize(
        config: &DistributionalConfig,
        tokenizer: &TieredTokenizer,
        products: &[ProductRecord],
    ) -> EmbedResult<EmbeddingBatch> {
        if products.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }

        let documents: Vec<Vec<String>> = products.iter().map(|p| tokenizer.product_tokens(p)).collect();

        let mut counts_by_token: BTreeMap<&str, usize> = BTreeMap::new();
        for token in documents.iter().flatten() {
            *counts_by_token.entry(token.as_str()).or_insert(0) += 1;
        }
        if counts_by_token.is_empty() {
            return Err(EmbedError::empty_vocabulary(EmbeddingMethod::Distributional));
        }
        let index: BTreeMap<&str, usize> = counts_by_token
            .keys()
            .enumerate()
            .map(|(i, t)| (*t, i))
            .collect();
        let counts: Vec<usize> = counts_by_token.values().copied().collect();
        let encoded: Vec<Vec<usize>> = documents
            .iter()
            .map(|doc| doc.iter().filter_map(|t| index.get(t.as_str()).copied()).collect())
            .collect();

        let vocab = counts.len();
        let dim = config.dimension.max(1);
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        let half = 0.5 / dim as f64;
        let mut input = Array2::from_shape_fn((vocab, dim), |_| rng.gen_range(-half..half));
        let mut output = Array2::<f64>::zeros((vocab, dim));
        let table = negative_table(&counts);

        let total_steps = (config.epochs * encoded.iter().map(Vec::len).sum::<usize>()).max(1);
        let mut step = 0usize;
        let mut gradient = vec![0.0; dim];

        for _ in 0..config.epochs {
            for doc in &encoded {
                for (i, &center) in doc.iter().enumerate() {
                    let progress = step as f64 / total_steps as f64;
                    let lr = (config.initial_learning_rate * (1.0 - progress))
                        .max(config.min_learning_rate);
                    step += 1;

                    let start = i.saturating_sub(config.window);
                    let end = (i + config.window + 1).min(doc.len());
                    for (j, &context) in doc.iter().enumerate().take(end).skip(start) {
                        if j == i {
                            continue;
                        }
                        gradient.iter_mut().for_each(|g| *g = 0.0);

                        for k in 0..=config.negatives {
                            let (target, label) = if k == 0 {
                                (center, 1.0)
                            } else {
                                let t = draw(&table, &mut rng);
                                if t == center {
                                    continue;
                                }
                                (t, 0.0)
                            };
                            let h = input.row(context);
                            let mut out_row = output.row_mut(target);
                            let f = sigmoid(h.dot(&out_row));
                            let g = (label - f) * lr;
                            for d in 0..dim {
                                gradient[d] += g * out_row[d];
                                out_row[d] += g * h[d];
                            }
                        }

                        let mut h = input.row_mut(context);
                        for (x, g) in h.iter_mut().zip(&gradient) {
                            *x += g;
                        }
                    }
                }
            }
        }

        let mut matrix = Array2::<f64>::zeros((products.len(), dim));
        for (mut row, doc) in matrix.axis_iter_mut(Axis(0)).zip(&encoded) {
            if doc.is_empty() {
                continue;
            }
            for &t in doc {
                row += &input.row(t);
            }
            row /= doc.len() as f64;
        }

        debug!(
            products = products.len(),
            vocabulary = vocab,
            dimension = dim,
            "Generated distributional embeddings"
        );

        Ok(EmbeddingBatch {
            method: EmbeddingMethod::Distributional,
            product_ids: products.iter().map(|p| p.id).collect(),
            matrix,
            metadata: BatchMetadata {
                feature_names: Vec::new(),
                vocabulary_size: vocab,
                tokenizer: Some(tokenizer.active().name().to_string()),
            },
        })
    }

}

#[cfg(all(test, feature = "distributional"))]
mod tests {
    use super::*;
    use crate::error::EmbedError;

    fn products() -> Vec<ProductRecord> {
        vec![
            ProductRecord::builder(1, "Apple Inc").sector("Technology").product_type("Stock").build(),
            ProductRecord::builder(2, "Microsoft Corp").sector("Technology").product_type("Stock").build(),
            ProductRecord::builder(3, "Exxon Mobil").sector("Energy").product_type("Stock").build(),
            ProductRecord::new(4, "of the"),
        ]
    }

    #[test]
    fn test_dimension_and_order() {
        let batch = DistributionalVectorizer::default().vectorize(&products()).unwrap();
        assert_eq!(batch.matrix.dim(), (4, 50));
        assert_eq!(batch.product_ids[3].get(), 4);
        assert_eq!(batch.metadata.tokenizer.as_deref(), Some("stopword"));
    }

    #[test]
    fn test_product_without_tokens_is_zero() {
        let batch = DistributionalVectorizer::default().vectorize(&products()).unwrap();
        assert!(batch.matrix.row(3).iter().all(|x| *x == 0.0));
        assert!(batch.matrix.row(0).iter().any(|x| *x != 0.0));
    }

    #[test]
    fn test_deterministic_under_seed() {
        let a = DistributionalVectorizer::default().vectorize(&products()).unwrap();
        let b = DistributionalVectorizer::default().vectorize(&products()).unwrap();
        assert_eq!(a.matrix, b.matrix);

        let other = DistributionalVectorizer::new(DistributionalConfig {
            seed: 7,
            ..DistributionalConfig::default()
        })
        .vectorize(&products())
        .unwrap();
        assert_ne!(a.matrix, other.matrix);
    }

    #[test]
    fn test_empty_vocabulary() {
        assert!(matches!(
            DistributionalVectorizer::default().vectorize(&[ProductRecord::new(1, "a")]),
            Err(EmbedError::EmptyVocabulary { .. })
        ));
    }
}
