//! Linear algebra utilities.
//!
//! Decompositions used by the embedding methods.

use log::debug;
use nalgebra::DMatrix;
use ndarray::Array2;

use crate::error::{MathError, MathResult};

/// Leading factors of a singular value decomposition.
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// Left singular vectors, one column per kept component (n x k).
    pub u: DMatrix<f64>,

    /// Kept singular values, descending.
    pub singular_values: Vec<f64>,
}

impl TruncatedSvd {
    /// Number of kept components.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    /// Row embeddings `U[:, :k] * sqrt(s)`.
    #[must_use]
    pub fn scaled_rows(&self) -> DMatrix<f64> {
        let mut out = self.u.clone();
        for (j, s) in self.singular_values.iter().enumerate() {
            let factor = s.max(0.0).sqrt();
            out.column_mut(j).scale_mut(factor);
        }
        out
    }
}

/// Computes the top `k` left singular vectors and singular values.
///
/// Components are ordered by descending singular value regardless of the
/// order the decomposition returns them in.
pub fn truncated_svd(matrix: &DMatrix<f64>, k: usize) -> MathResult<TruncatedSvd> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if k == 0 {
        return Err(MathError::invalid_input("truncated SVD needs k >= 1"));
    }
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(MathError::invalid_input("SVD input contains non-finite values"));
    }

    let svd = matrix.clone().svd(true, false);
    let u = svd
        .u
        .ok_or_else(|| MathError::decomposition_failed("left singular vectors not computed"))?;

    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|&a, &b| svd.singular_values[b].total_cmp(&svd.singular_values[a]));

    let k = k.min(order.len());
    let mut kept_u = DMatrix::zeros(rows, k);
    let mut kept_s = Vec::with_capacity(k);
    for (j, &idx) in order.iter().take(k).enumerate() {
        kept_u.set_column(j, &u.column(idx));
        kept_s.push(svd.singular_values[idx]);
    }

    debug!("Truncated SVD of {rows}x{cols} to rank {k}");
    Ok(TruncatedSvd {
        u: kept_u,
        singular_values: kept_s,
    })
}

/// Converts an ndarray matrix into an nalgebra matrix.
#[must_use]
pub fn to_dmatrix(array: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = array.dim();
    DMatrix::from_fn(rows, cols, |i, j| array[[i, j]])
}

/// Converts an nalgebra matrix into an ndarray matrix.
#[must_use]
pub fn to_array2(matrix: &DMatrix<f64>) -> Array2<f64> {
    let (rows, cols) = matrix.shape();
    Array2::from_shape_fn((rows, cols), |(i, j)| matrix[(i, j)])
}
