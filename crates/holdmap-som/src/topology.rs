//! Grid geometry and the U-matrix.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Offsets of the 8-connected neighborhood.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// In-bounds 8-connected neighbors of `(x, y)` on a `width x height` grid.
pub fn neighbors(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOR_OFFSETS.iter().filter_map(move |(dx, dy)| {
        let nx = x.checked_add_signed(*dx)?;
        let ny = y.checked_add_signed(*dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    })
}

/// Squared Euclidean distance between two grid positions.
#[must_use]
pub fn grid_distance_sq(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    dx * dx + dy * dy
}

/// Mean distance from each neuron to its grid neighbors (a U-matrix).
///
/// Indexed `[x, y]`. High values mark boundaries between clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMap {
    values: Array2<f64>,
}

impl DistanceMap {
    /// Wraps a `width x height` array.
    #[must_use]
    pub fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// Grid width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.values.nrows()
    }

    /// Grid height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.values.ncols()
    }

    /// Value at `(x, y)`, if in bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.values.get((x, y)).copied()
    }

    /// Largest value, zero for an empty map.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Copy scaled so the largest value is 1. An all-zero map is returned as is.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = self.max();
        if max <= 0.0 {
            return self.clone();
        }
        Self {
            values: self.values.mapv(|v| v / max),
        }
    }

    /// Underlying array.
    #[must_use]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
