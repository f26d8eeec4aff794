//! Vectorizer trait and capability registry.

use std::collections::BTreeMap;

use holdmap_core::{EmbeddingMethod, ProductRecord};
use tracing::{info, warn};

use crate::batch::EmbeddingBatch;
use crate::cooccurrence::CooccurrenceVectorizer;
use crate::distributional::DistributionalVectorizer;
use crate::error::{EmbedError, EmbedResult};
use crate::hybrid::{HybridScaling, HybridVectorizer};
use crate::tfidf::FrequencyTextVectorizer;

/// Turns a batch of products into one vector per product.
pub trait ProductVectorizer: Send + Sync {
    /// Method implemented.
    fn method(&self) -> EmbeddingMethod;

    /// Returns true if the method can run in this build.
    fn available(&self) -> bool {
        true
    }

    /// Vectorizes `products`, one row each, in input order.
    fn vectorize(&self, products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch>;
}

/// Per-method result of [`MethodRegistry::vectorize_all`].
#[derive(Debug, Clone)]
pub enum MethodOutcome {
    /// Embeddings were produced.
    Generated(EmbeddingBatch),

    /// The method is not available and was not attempted.
    Skipped,

    /// The method ran and failed.
    Failed(EmbedError),
}

impl MethodOutcome {
    /// Returns true for `Generated`.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// One vectorizer per method, queried by capability.
pub struct MethodRegistry {
    vectorizers: BTreeMap<EmbeddingMethod, Box<dyn ProductVectorizer>>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::with_scaling(HybridScaling::default())
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.vectorizers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MethodRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vectorizers: BTreeMap::new(),
        }
    }

    /// All built-in methods with the given hybrid scaling.
    #[must_use]
    pub fn with_scaling(scaling: HybridScaling) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(HybridVectorizer::new(scaling)));
        registry.register(Box::new(FrequencyTextVectorizer::default()));
        registry.register(Box::new(DistributionalVectorizer::default()));
        registry.register(Box::new(CooccurrenceVectorizer::default()));
        registry
    }

    /// Adds or replaces the vectorizer for its method.
    pub fn register(&mut self, vectorizer: Box<dyn ProductVectorizer>) {
        self.vectorizers.insert(vectorizer.method(), vectorizer);
    }

    /// Returns true if `method` is registered and available.
    #[must_use]
    pub fn available(&self, method: EmbeddingMethod) -> bool {
        self.vectorizers.get(&method).is_some_and(|v| v.available())
    }

    /// Methods that can run, in registry order.
    #[must_use]
    pub fn available_methods(&self) -> Vec<EmbeddingMethod> {
        self.vectorizers
            .values()
            .filter(|v| v.available())
            .map(|v| v.method())
            .collect()
    }

    /// Vectorizes with one method.
    pub fn vectorize(
        &self,
        method: EmbeddingMethod,
        products: &[ProductRecord],
    ) -> EmbedResult<EmbeddingBatch> {
        match self.vectorizers.get(&method) {
            Some(v) if v.available() => v.vectorize(products),
            _ => Err(EmbedError::unavailable(method)),
        }
    }

    /// Runs every registered method and reports each outcome.
    pub fn vectorize_all(&self, products: &[ProductRecord]) -> BTreeMap<EmbeddingMethod, MethodOutcome> {
        let mut outcomes = BTreeMap::new();
        for (method, vectorizer) in &self.vectorizers {
            let outcome = if !vectorizer.available() {
                warn!(%method, "Skipping unavailable embedding method");
                MethodOutcome::Skipped
            } else {
                match vectorizer.vectorize(products) {
                    Ok(batch) => MethodOutcome::Generated(batch),
                    Err(e) => {
                        warn!(%method, error = %e, "Embedding generation failed");
                        MethodOutcome::Failed(e)
                    }
                }
            };
            outcomes.insert(*method, outcome);
        }

        let generated = outcomes.values().filter(|o| o.is_generated()).count();
        info!(
            products = products.len(),
            generated,
            methods = outcomes.len(),
            "Generated product embeddings"
        );
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl ProductVectorizer for Offline {
        fn method(&self) -> EmbeddingMethod {
            EmbeddingMethod::Distributional
        }
        fn available(&self) -> bool {
            false
        }
        fn vectorize(&self, _products: &[ProductRecord]) -> EmbedResult<EmbeddingBatch> {
            Err(EmbedError::unavailable(EmbeddingMethod::Distributional))
        }
    }

    fn products() -> Vec<ProductRecord> {
        vec![
            ProductRecord::builder(1, "Apple Inc").sector("Technology").build(),
            ProductRecord::builder(2, "Exxon Mobil").sector("Energy").build(),
        ]
    }

    #[test]
    fn test_unavailable_method_is_skipped() {
        let mut registry = MethodRegistry::default();
        registry.register(Box::new(Offline));

        assert!(!registry.available(EmbeddingMethod::Distributional));
        assert!(!registry
            .available_methods()
            .contains(&EmbeddingMethod::Distributional));

        let outcomes = registry.vectorize_all(&products());
        assert!(matches!(
            outcomes[&EmbeddingMethod::Distributional],
            MethodOutcome::Skipped
        ));
        assert!(outcomes[&EmbeddingMethod::Hybrid].is_generated());

        assert!(matches!(
            registry.vectorize(EmbeddingMethod::Distributional, &products()),
            Err(EmbedError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_failures_are_reported() {
        let outcomes = MethodRegistry::default().vectorize_all(&[]);
        assert!(outcomes
            .values()
            .all(|o| matches!(o, MethodOutcome::Failed(_) | MethodOutcome::Skipped)));
    }

    #[test]
    fn test_empty_registry() {
        let registry = MethodRegistry::empty();
        assert!(registry.available_methods().is_empty());
        assert!(registry.vectorize(EmbeddingMethod::Hybrid, &products()).is_err());
    }
}
