//! # Holdmap Embed
//!
//! Product vectorizers for the Holdmap portfolio clustering library.
//!
//! Four interchangeable methods turn a batch of [`ProductRecord`]s into one
//! fixed-dimension vector per product:
//!
//! - **Hybrid**: hashed categorical attributes plus numeric attributes
//! - **Frequency text**: TF-IDF over unigrams and bigrams
//! - **Distributional**: averaged skip-gram token vectors (`distributional` feature)
//! - **Co-occurrence**: SVD of a distance-weighted co-occurrence matrix
//!
//! [`MethodRegistry`] dispatches by [`EmbeddingMethod`] and reports which
//! methods are available in the current build.
//!
//! ## Example
//!
//! ```rust
//! use holdmap_core::{EmbeddingMethod, ProductRecord};
//! use holdmap_embed::MethodRegistry;
//!
//! let products = vec![
//!     ProductRecord::builder(1, "Apple Inc").sector("Technology").build(),
//!     ProductRecord::builder(2, "Exxon Mobil").sector("Energy").build(),
//! ];
//!
//! let registry = MethodRegistry::default();
//! let batch = registry.vectorize(EmbeddingMethod::Hybrid, &products).unwrap();
//! assert_eq!(batch.len(), 2);
//! ```
//!
//! [`ProductRecord`]: holdmap_core::ProductRecord
//! [`EmbeddingMethod`]: holdmap_core::EmbeddingMethod

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::similar_names)]

pub mod batch;
pub mod cooccurrence;
pub mod distributional;
pub mod error;
pub mod hybrid;
pub mod registry;
pub mod text;
pub mod tfidf;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchMetadata, EmbeddingBatch};
    pub use crate::cooccurrence::{CooccurrenceConfig, CooccurrenceVectorizer};
    pub use crate::distributional::{DistributionalConfig, DistributionalVectorizer};
    pub use crate::error::{EmbedError, EmbedResult};
    pub use crate::hybrid::{HybridScaling, HybridVectorizer};
    pub use crate::registry::{MethodOutcome, MethodRegistry, ProductVectorizer};
    pub use crate::text::{SimpleTokenizer, StopwordTokenizer, TieredTokenizer, Tokenize};
    pub use crate::tfidf::{FrequencyTextConfig, FrequencyTextVectorizer};
}

pub use batch::{BatchMetadata, EmbeddingBatch};
pub use error::{EmbedError, EmbedResult};
pub use hybrid::HybridScaling;
pub use registry::{MethodOutcome, MethodRegistry, ProductVectorizer};
