//! End-to-end clustering of portfolio vectors.
//!
//! [`ClusteringRun::execute`] standardizes the portfolio vectors, trains a
//! fresh map and assigns every holder to a cell. The returned
//! [`ClusteringOutcome`] keeps the fitted standardizer and the frozen grid,
//! so holders added later can be placed with [`ClusteringOutcome::assign`]
//! without retraining.

use holdmap_core::{ClusteringConfig, EmbeddingMethod, HolderId, PortfolioEmbedding};
use holdmap_math::scaling::rows_to_matrix;
use holdmap_math::Standardizer;
use holdmap_portfolio::party::HolderProfile;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cluster::{assign_clusters, check_dimensions, cluster_id, ClusterAssignment};
use crate::error::{SomError, SomResult};
use crate::grid::{SomGrid, SomParams, TrainingReport};
use crate::report::{summarize_clusters, ClusterSummary, ValidationMetrics};
use crate::topology::DistanceMap;

/// A configured clustering run.
#[derive(Debug, Clone, Default)]
pub struct ClusteringRun {
    config: ClusteringConfig,
}

impl ClusteringRun {
    /// Creates a run with the given configuration.
    #[must_use]
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Trains a map on `portfolios` and assigns every holder.
    ///
    /// Only portfolios aggregated from the configured embedding method are
    /// used; others are ignored with a warning.
    ///
    /// # Errors
    ///
    /// - [`SomError::InvalidConfig`] if the configuration is out of range
    /// - [`SomError::InsufficientHolders`] below `min_holders`
    /// - [`SomError::DimensionMismatch`] if vectors differ in length
    pub fn execute(&self, portfolios: &[PortfolioEmbedding]) -> SomResult<ClusteringOutcome> {
        let config = &self.config;
        config.validate()?;

        let label = config.embedding_method.portfolio_label();
        let selected: Vec<PortfolioEmbedding> = portfolios
            .iter()
            .filter(|p| p.method == label)
            .cloned()
            .collect();
        if selected.len() < portfolios.len() {
            warn!(
                ignored = portfolios.len() - selected.len(),
                method = %label,
                "ignoring portfolios from other methods"
            );
        }

        if selected.len() < config.min_holders.max(1) {
            return Err(SomError::InsufficientHolders {
                required: config.min_holders.max(1),
                actual: selected.len(),
            });
        }

        let dimension = selected[0].dimension();
        check_dimensions(&selected, dimension)?;

        info!(
            holders = selected.len(),
            dimension,
            grid = %format!("{}x{}", config.grid_width, config.grid_height),
            method = %label,
            "clustering portfolios"
        );

        let rows: Vec<Vec<f64>> = selected.iter().map(|p| p.vector.clone()).collect();
        let (standardizer, standardized) = Standardizer::fit_transform(&rows_to_matrix(&rows)?)?;

        let mut grid = SomGrid::new(
            config.grid_width,
            config.grid_height,
            dimension,
            SomParams::from_config(config),
        )?;
        let training = grid.train(&standardized, config.iterations)?;

        let assignments: Vec<ClusterAssignment> = selected
            .iter()
            .zip(grid.winners(&standardized, config)?)
            .map(|(portfolio, ((x, y), distance))| ClusterAssignment {
                holder_id: portfolio.holder_id,
                cluster_id: cluster_id(x, y, grid.height()),
                grid_x: x,
                grid_y: y,
                distance,
            })
            .collect();

        let distance_map = grid.distance_map()?;
        let validation = ValidationMetrics::from_assignments(&assignments);
        info!(
            clusters = validation.cluster_count,
            largest = validation.largest_cluster,
            quantization_error = training.quantization_error,
            "clustering finished"
        );

        Ok(ClusteringOutcome {
            method: config.embedding_method,
            config: config.clone(),
            grid,
            standardizer,
            training,
            assignments,
            distance_map,
            validation,
        })
    }
}

/// Trained model and results of a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    /// Product method behind the portfolio vectors.
    pub method: EmbeddingMethod,
    /// Configuration the run used.
    pub config: ClusteringConfig,
    /// The trained map.
    pub grid: SomGrid,
    /// Column statistics of the training vectors.
    pub standardizer: Standardizer,
    /// Training summary.
    pub training: TrainingReport,
    /// One assignment per training holder, in input order.
    pub assignments: Vec<ClusterAssignment>,
    /// U-matrix of the trained map.
    pub distance_map: DistanceMap,
    /// Cluster size statistics.
    pub validation: ValidationMetrics,
}

impl ClusteringOutcome {
    /// Places further portfolios on the trained map.
    pub fn assign(&self, portfolios: &[PortfolioEmbedding]) -> SomResult<Vec<ClusterAssignment>> {
        assign_clusters(&self.grid, &self.standardizer, portfolios, &self.config)
    }

    /// Assignment of `holder` from the training run.
    #[must_use]
    pub fn assignment_for(&self, holder: HolderId) -> Option<&ClusterAssignment> {
        self.assignments.iter().find(|a| a.holder_id == holder)
    }

    /// Per-cluster summaries joined with holder profiles.
    #[must_use]
    pub fn report(&self, profiles: &[HolderProfile], top_k: usize) -> Vec<ClusterSummary> {
        summarize_clusters(&self.assignments, profiles, top_k)
    }
}
