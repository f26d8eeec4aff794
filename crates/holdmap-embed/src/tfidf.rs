//! Frequency-text (TF-IDF) product vectors.
//!
//! Documents are the lowercased text features of each product. Terms are
//! unigrams and bigrams of `\b\w\w+\b` words with stop-words removed. The
//! vocabulary keeps at most `max_features` terms by corpus frequency after
//! dropping terms present in more than `max_df` of the documents.

use std::collections::{BTreeMap, HashMap};

use holdmap_core::{EmbeddingMethod, ProductRecord};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batch::{BatchMetadata, EmbeddingBatch};
use crate::error::{EmbedError, EmbedResult};
use crate::registry::ProductVectorizer;
use crate::text::{product_document, unigrams_and_bigrams};

fn default_max_features() -> usize {
    100
}

fn default_max_df() -> f64 {
    0.95
}

/// Vocabulary limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTextConfig {
    /// Maximum vocabulary size.
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Maximum document frequency as a fraction of documents.
    #[serde(default = "default_max_df")]
    pub max_df: f64,
}

impl Default for FrequencyTextConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            max_df: default_max_df(),
        }
    }
}

impl FrequencyTextConfig {
    /// Largest document count a term may have. Never below one.
    #[must_use]
    pub fn max_doc_count(&self, documents: usize) -> usize {
        ((self.max_df * documents as f64).floor() as usize).max(1)
    }
}

/// The frequency-text vectorizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyTextVectorizer {
    config: FrequencyTextConfig,
}

impl FrequencyTextVectorizer {
    /// Creates a vectorizer with custom limits.
    #[must_use]
    pub fn new(config: FrequencyTextConfig) -> Self {
        Self { config }
    }

    /// Builds the sorted vocabulary from tokenized documents.
    fn vocabulary(&self, documents: &[Vec<String>]) -> Vec<String> {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        for terms in documents {
            let mut seen: Vec<&str> = terms.iter().map(String::as_str).collect();
            for term in &seen {
                *corpus_freq.entry(*term).or_insert(0) += 1;
            }
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let limit = self.config.max_doc_count(documents.len());
        let mut candidates: Vec<(&str, usize)> = corpus_freq
            .into_iter()
            .filter(|(term, _)| doc_freq.get(term).is_some_and(|df| *df <= limit))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(self.config.max_features);

        let mut vocabulary: Vec<String> = candidates.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort_unstable();
        vocabulary
    }
}

impl ProductVectorizer for FrequencyTextVectorizer {
    fn method(&self) -> EmbeddingMethod {
        EmbeddingMethod::FrequencyText
    }

    fn vectorize(&self, products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch> {
        if products.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }

        let documents: Vec<Vec<String>> = products
            .iter()
            .map(|p| unigrams_and_bigrams(&product_document(p)))
            .collect();
        let vocabulary = self.vocabulary(&documents);
        if vocabulary.is_empty() {
            return Err(EmbedError::empty_vocabulary(EmbeddingMethod::FrequencyText));
        }

        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let n = documents.len();
        let mut matrix = Array2::<f64>::zeros((n, vocabulary.len()));
        for (row, terms) in documents.iter().enumerate() {
            for term in terms {
                if let Some(&col) = index.get(term.as_str()) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }

        let mut idf = vec![0.0; vocabulary.len()];
        for (col, weight) in idf.iter_mut().enumerate() {
            let df = matrix.column(col).iter().filter(|x| **x > 0.0).count();
            *weight = ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0;
        }

        for mut row in matrix.outer_iter_mut() {
            for (x, w) in row.iter_mut().zip(&idf) {
                *x *= w;
            }
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|x| x / norm);
            }
        }

        debug!(
            products = n,
            vocabulary = vocabulary.len(),
            "Generated frequency-text embeddings"
        );

        Ok(EmbeddingBatch {
            method: EmbeddingMethod::FrequencyText,
            product_ids: products.iter().map(|p| p.id).collect(),
            matrix,
            metadata: BatchMetadata {
                vocabulary_size: vocabulary.len(),
                feature_names: vocabulary,
                tokenizer: Some("word_pattern".to_string()),
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
            ProductRecord::builder(3, "Exxon Mobil").sector("Energy").build(),
        ]
    }

    #[test]
    fn test_rows_are_unit_length() {
        let batch = FrequencyTextVectorizer::default().vectorize(&products()).unwrap();
        assert_eq!(batch.len(), 3);
        for row in batch.matrix.outer_iter() {
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_vocabulary_sorted_with_bigrams() {
        let batch = FrequencyTextVectorizer::default().vectorize(&products()).unwrap();
        let vocab = &batch.metadata.feature_names;
        let mut sorted = vocab.clone();
        sorted.sort();
        assert_eq!(vocab, &sorted);
        assert!(vocab.contains(&"apple inc".to_string()));
        assert_eq!(batch.dimension(), vocab.len());
    }

    #[test]
    fn test_shared_term_weighs_less() {
        let batch = FrequencyTextVectorizer::default().vectorize(&products()).unwrap();
        let vocab = &batch.metadata.feature_names;
        let tech = vocab.iter().position(|t| t == "technology").unwrap();
        let apple = vocab.iter().position(|t| t == "apple").unwrap();
        assert!(batch.matrix[[0, apple]] > batch.matrix[[0, tech]]);
    }

    #[test]
    fn test_max_df_drops_ubiquitous_terms() {
        let products: Vec<_> = (0..3)
            .map(|i| ProductRecord::builder(i, format!("Fund {}", ["alpha", "beta", "gamma"][i as usize])).build())
            .collect();
        let batch = FrequencyTextVectorizer::default().vectorize(&products).unwrap();
        assert!(!batch.metadata.feature_names.contains(&"fund".to_string()));
    }

    #[test]
    fn test_max_features_limit() {
        let config = FrequencyTextConfig {
            max_features: 2,
            ..FrequencyTextConfig::default()
        };
        let batch = FrequencyTextVectorizer::new(config).vectorize(&products()).unwrap();
        assert_eq!(batch.dimension(), 2);
    }

    #[test]
    fn test_single_document_keeps_terms() {
        assert_eq!(FrequencyTextConfig::default().max_doc_count(1), 1);
        let batch = FrequencyTextVectorizer::default()
            .vectorize(&[ProductRecord::new(1, "Apple Inc")])
            .unwrap();
        assert_eq!(batch.dimension(), 3);
    }

    #[test]
    fn test_empty_vocabulary() {
        let products = vec![ProductRecord::new(1, "a"), ProductRecord::new(2, "the")];
        assert!(matches!(
            FrequencyTextVectorizer::default().vectorize(&products),
            Err(EmbedError::EmptyVocabulary { .. })
        ));
    }
}
