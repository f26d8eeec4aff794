//! # Holdmap Math
//!
//! Numerical utilities for the Holdmap portfolio clustering library.
//!
//! This crate provides:
//!
//! - **Scaling**: Column standardization fitted once and reused for queries
//! - **Linear Algebra**: Truncated SVD and ndarray/nalgebra conversion
//! - **Distance**: Euclidean distance, norms and vector means

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod distance;
pub mod error;
pub mod linear_algebra;
pub mod scaling;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distance::{euclidean, l2_norm, mean_vector, normalize_in_place, squared_euclidean};
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{truncated_svd, TruncatedSvd};
    pub use crate::scaling::{rows_to_matrix, Standardizer};
}

pub use error::{MathError, MathResult};
pub use scaling::Standardizer;
