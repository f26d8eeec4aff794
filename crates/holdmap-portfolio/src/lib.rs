//! # Holdmap Portfolio
//!
//! Holder-level analytics over disclosed holdings.
//!
//! This crate turns each holder's disclosures into portfolio-level data that
//! the clustering stage consumes.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Reportable failures**: A holder without a vector gets an [`AggregationFailure`]
//! - **Config-driven parallelism**: Optional rayon support with threshold-based switching
//!
//! ## Features
//!
//! - **Value parsing**: Disclosure ranges and phrases into estimates
//! - **Weighted aggregation**: Value-weighted portfolio embeddings with container deduplication
//! - **Diversification**: HHI, Shannon entropy, diversification score
//! - **Risk profiles**: Two named classification schemes
//! - **Party patterns**: Per-party averages and sector preferences
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use holdmap_portfolio::prelude::*;
//!
//! let holdings = vec![
//!     AssetHolding::new(HolderId(1), ProductId(10), "Index Fund", "$15,001 - $50,000"),
//!     AssetHolding::new(HolderId(1), ProductId(11), "Utility Co", "$1,001 - $15,000"),
//! ];
//! let embeddings: EmbeddingIndex = HashMap::from([
//!     (ProductId(10), vec![1.0, 0.0]),
//!     (ProductId(11), vec![0.0, 1.0]),
//! ]);
//!
//! let portfolio = aggregate_portfolio(
//!     HolderId(1),
//!     &holdings,
//!     &embeddings,
//!     EmbeddingMethod::Hybrid,
//!     &AggregationConfig::sequential(),
//! )
//! .unwrap();
//! assert_eq!(portfolio.asset_count, 2);
//! assert!(portfolio.vector[0] > portfolio.vector[1]);
//! ```
//!
//! ## Module Overview
//!
//! - [`value`] - Disclosed value parsing
//! - [`aggregate`] - Weighted portfolio aggregation
//! - [`metrics`] - Sector concentration and diversification
//! - [`risk`] - Risk profile classification
//! - [`features`] - Portfolio feature vectors
//! - [`party`] - Holder profiles and party patterns
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing for large holder batches

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

// Module declarations
pub mod aggregate;
pub mod config;
pub mod error;
pub mod features;
pub mod metrics;
pub mod parallel;
pub mod party;
pub mod risk;
pub mod value;

// Re-export error types at crate root
pub use error::{AggregationFailure, AggregationResult};

pub use config::AggregationConfig;

pub use aggregate::{
    aggregate_portfolio, aggregate_portfolios, embedding_index, AggregationRun, EmbeddingIndex,
    WEIGHTED_AVERAGE,
};

pub use metrics::{
    diversification_score, herfindahl_index, shannon_entropy, DiversificationMetrics,
    IndustryConcentration, SectorExposure, UNCLASSIFIED_SECTOR,
};

pub use risk::{classify_risk, RiskProfile, RiskScheme};

pub use value::{parse_asset_value, ValueEstimate};

pub use features::{collect_sectors, feature_names, portfolio_feature_vector};

pub use party::{analyze_party_patterns, top_counts, HolderProfile, PartyPattern, UNKNOWN_PARTY};

// Parallel utilities
pub use parallel::maybe_parallel_map;

/// Prelude module for convenient imports.
///
/// ```rust
/// use holdmap_portfolio::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{AggregationFailure, AggregationResult};

    // Config
    pub use crate::config::AggregationConfig;

    // Aggregation
    pub use crate::aggregate::{
        aggregate_portfolio, aggregate_portfolios, embedding_index, AggregationRun,
        EmbeddingIndex,
    };

    // Metrics
    pub use crate::metrics::{
        diversification_score, herfindahl_index, shannon_entropy, DiversificationMetrics,
        SectorExposure,
    };
    pub use crate::risk::{classify_risk, RiskProfile, RiskScheme};

    // Values
    pub use crate::value::{parse_asset_value, ValueEstimate};

    // Party analysis
    pub use crate::party::{analyze_party_patterns, HolderProfile, PartyPattern};

    // Re-export commonly used types from dependencies
    pub use holdmap_core::{
        AssetHolding, EmbeddingMethod, HolderId, PortfolioEmbedding, ProductEmbedding, ProductId,
        ProductRecord,
    };
    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}
