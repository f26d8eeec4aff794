//! Mapping holders onto grid cells.

use holdmap_core::{HolderId, ParallelPolicy, PortfolioEmbedding};
use holdmap_math::scaling::rows_to_matrix;
use holdmap_math::Standardizer;
use serde::{Deserialize, Serialize};

use crate::error::{SomError, SomResult};
use crate::grid::SomGrid;

/// Cluster id of grid cell `(x, y)` on a map of the given height.
///
/// Ids are unique over a `width x height` grid and range over
/// `0..width * height`.
#[must_use]
pub fn cluster_id(x: usize, y: usize, height: usize) -> usize {
    x * height + y
}

/// One holder's cell on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// The holder.
    pub holder_id: HolderId,
    /// See [`cluster_id`].
    pub cluster_id: usize,
    /// Grid x of the BMU.
    pub grid_x: usize,
    /// Grid y of the BMU.
    pub grid_y: usize,
    /// Distance from the standardized vector to its BMU weights.
    pub distance: f64,
}

/// Checks that every portfolio vector has `expected` components.
pub(crate) fn check_dimensions(portfolios: &[PortfolioEmbedding], expected: usize) -> SomResult<()> {
    match portfolios.iter().find(|p| p.dimension() != expected) {
        Some(p) => Err(SomError::dimension_mismatch(expected, p.dimension())),
        None => Ok(()),
    }
}

/// Assigns each portfolio to its BMU cell.
///
/// Vectors are standardized with the statistics fitted at training time, so
/// new holders land on the same scale as the training set.
pub fn assign_clusters<P>(
    grid: &SomGrid,
    standardizer: &Standardizer,
    portfolios: &[PortfolioEmbedding],
    policy: &P,
) -> SomResult<Vec<ClusterAssignment>>
where
    P: ParallelPolicy + Sync + ?Sized,
{
    if portfolios.is_empty() {
        return Ok(Vec::new());
    }
    check_dimensions(portfolios, standardizer.dimension())?;

    let rows: Vec<Vec<f64>> = portfolios.iter().map(|p| p.vector.clone()).collect();
    let standardized = standardizer.transform(&rows_to_matrix(&rows)?)?;
    let winners = grid.winners(&standardized, policy)?;

    Ok(portfolios
        .iter()
        .zip(winners)
        .map(|(portfolio, ((x, y), distance))| ClusterAssignment {
            holder_id: portfolio.holder_id,
            cluster_id: cluster_id(x, y, grid.height()),
            grid_x: x,
            grid_y: y,
            distance,
        })
        .collect())
}
