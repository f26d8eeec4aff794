//! Column standardization.
//!
//! [`Standardizer`] learns per-column mean and population standard deviation
//! from a training matrix and maps rows to zero mean and unit variance.
//! Columns with zero variance keep a unit scale, so their training values
//! map to exactly zero.

use log::debug;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Variances below this are treated as zero.
const MIN_STD: f64 = 1e-12;

/// Fitted per-column mean/scale pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Standardizer {
    /// Fits column statistics from `data` (rows are samples).
    pub fn fit(data: &Array2<f64>) -> MathResult<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(MathError::insufficient_data(1, 0));
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(MathError::invalid_input("standardizer input contains non-finite values"));
        }

        let n = rows as f64;
        let mut mean = Vec::with_capacity(cols);
        let mut scale = Vec::with_capacity(cols);
        let mut constant = 0;
        for column in data.axis_iter(Axis(1)) {
            let m = column.sum() / n;
            let var = column.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            mean.push(m);
            if std < MIN_STD {
                constant += 1;
                scale.push(1.0);
            } else {
                scale.push(std);
            }
        }

        debug!("Fitted standardizer on {rows}x{cols} ({constant} constant columns)");
        Ok(Self { mean, scale })
    }

    /// Fits on `data` and returns the transformed copy alongside the fit.
    pub fn fit_transform(data: &Array2<f64>) -> MathResult<(Self, Array2<f64>)> {
        let fitted = Self::fit(data)?;
        let transformed = fitted.transform(data)?;
        Ok((fitted, transformed))
    }

    /// Number of columns this standardizer was fitted on.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Per-column means.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-column scales (population standard deviation, or 1 for constant columns).
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardizes every row of `data`.
    pub fn transform(&self, data: &Array2<f64>) -> MathResult<Array2<f64>> {
        if data.ncols() != self.dimension() {
            return Err(MathError::dimension_mismatch(self.dimension(), data.ncols()));
        }
        let mut out = data.clone();
        for mut row in out.axis_iter_mut(Axis(0)) {
            for ((x, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *x = (*x - m) / s;
            }
        }
        Ok(out)
    }

    /// Standardizes a single row.
    pub fn transform_row(&self, row: ArrayView1<'_, f64>) -> MathResult<Vec<f64>> {
        if row.len() != self.dimension() {
            return Err(MathError::dimension_mismatch(self.dimension(), row.len()));
        }
        Ok(row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((x, m), s)| (x - m) / s)
            .collect())
    }
}

/// Builds a row-major matrix from equal-length rows.
pub fn rows_to_matrix(rows: &[Vec<f64>]) -> MathResult<Array2<f64>> {
    let Some(first) = rows.first() else {
        return Ok(Array2::zeros((0, 0)));
    };
    let cols = first.len();
    let mut flat = Vec::with_capacity(rows.len() * cols);
    for row in rows {
        if row.len() != cols {
            return Err(MathError::dimension_mismatch(cols, row.len()));
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), cols), flat)
        .map_err(|e| MathError::invalid_input(e.to_string()))
}
