//! # Holdmap SOM
//!
//! Self-organizing map clustering of holder portfolio vectors.
//!
//! - [`SomGrid`]: seeded, reproducible Kohonen map with a U-matrix
//! - [`assign_clusters`]: places standardized vectors on grid cells
//! - [`summarize_clusters`]: per-cluster party, risk and sector summaries
//! - [`ClusteringRun`]: standardize, train, assign and validate in one call
//!
//! ## Example
//!
//! ```rust
//! use holdmap_core::{ClusteringConfig, HolderId, PortfolioEmbedding, PortfolioMetadata};
//! use holdmap_som::ClusteringRun;
//!
//! let portfolios: Vec<PortfolioEmbedding> = (0..6u64)
//!     .map(|i| PortfolioEmbedding {
//!         holder_id: HolderId(i),
//!         method: "hybrid_weighted".to_string(),
//!         vector: vec![(i % 2) as f64, i as f64 / 6.0],
//!         asset_count: 1,
//!         total_value: 1000.0,
//!         metadata: PortfolioMetadata::default(),
//!     })
//!     .collect();
//!
//! let run = ClusteringRun::new(ClusteringConfig::new().with_grid(2, 2).with_iterations(200));
//! let outcome = run.execute(&portfolios).unwrap();
//! assert_eq!(outcome.assignments.len(), 6);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based BMU queries for large holder batches

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

pub mod cluster;
pub mod error;
pub mod grid;
pub mod report;
pub mod run;
pub mod topology;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cluster::{assign_clusters, cluster_id, ClusterAssignment};
    pub use crate::error::{SomError, SomResult};
    pub use crate::grid::{SomGrid, SomParams, TrainingReport};
    pub use crate::report::{summarize_clusters, ClusterSummary, ValidationMetrics};
    pub use crate::run::{ClusteringOutcome, ClusteringRun};
    pub use crate::topology::DistanceMap;
}

pub use cluster::{assign_clusters, cluster_id, ClusterAssignment};
pub use error::{SomError, SomResult};
pub use grid::{SomGrid, SomParams, TrainingReport};
pub use report::{summarize_clusters, ClusterSummary, ValidationMetrics, DEFAULT_TOP_SECTORS};
pub use run::{ClusteringOutcome, ClusteringRun};
pub use topology::DistanceMap;
