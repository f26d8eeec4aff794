//! # Holdmap Core
//!
//! Core types and run configuration for the Holdmap portfolio clustering
//! library.
//!
//! This crate provides the foundational building blocks used throughout Holdmap:
//!
//! - **Identifiers**: `ProductId` and `HolderId` newtypes
//! - **Types**: `ProductRecord`, `AssetHolding`, embedding rows, `EmbeddingMethod`
//! - **Configuration**: `ClusteringConfig`, loadable from TOML
//!
//! ## Example
//!
//! ```rust
//! use holdmap_core::prelude::*;
//!
//! let product = ProductRecord::builder(1, "Apple Inc")
//!     .sector("Technology")
//!     .product_type("Stock")
//!     .build();
//! assert_eq!(product.text_features(), vec!["Apple Inc", "Technology"]);
//!
//! let config = ClusteringConfig::new().with_grid(4, 4);
//! assert_eq!(config.neuron_count(), 16);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod config;
pub mod error;
pub mod ids;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ClusteringConfig, DecaySchedule, ParallelPolicy, SampleOrder};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::ids::{HolderId, ProductId};
    pub use crate::types::{
        AssetHolding, EmbeddingMethod, PortfolioEmbedding, PortfolioMetadata, ProductEmbedding,
        ProductRecord,
    };
}

// Re-export commonly used types at crate root
pub use config::{ClusteringConfig, DecaySchedule, ParallelPolicy, SampleOrder};
pub use error::{CoreError, CoreResult};
pub use ids::{HolderId, ProductId};
pub use types::{
    is_zero_vector, AssetHolding, EmbeddingMethod, PortfolioEmbedding, PortfolioMetadata,
    ProductEmbedding, ProductRecord, ProductRecordBuilder,
};
