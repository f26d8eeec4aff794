//! Error types for portfolio aggregation.
//!
//! Aggregation never fails with an opaque error: each variant names the
//! reason a holder produced no portfolio vector, so batch runs can report
//! skipped holders individually.

use holdmap_core::HolderId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for portfolio aggregation.
pub type AggregationResult<T> = Result<T, AggregationFailure>;

/// Reasons a holder's portfolio vector could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationFailure {
    /// The holder has no holdings at all.
    #[error("Holder {holder} has no holdings")]
    NoHoldings {
        /// The holder.
        holder: HolderId,
    },

    /// Every holding was a container or had a non-positive value.
    #[error("Holder {holder} has no holdings with resolvable values")]
    NoResolvableValues {
        /// The holder.
        holder: HolderId,
    },

    /// No surviving holding had a usable product embedding.
    #[error("Holder {holder} has no holdings with product embeddings")]
    NoHoldingsWithEmbeddings {
        /// The holder.
        holder: HolderId,
    },

    /// Product embeddings of different lengths were mixed.
    #[error("Holder {holder}: embedding dimension {actual} does not match {expected}")]
    DimensionMismatch {
        /// The holder.
        holder: HolderId,
        /// Dimension of the first usable embedding.
        expected: usize,
        /// Offending dimension.
        actual: usize,
    },
}

impl AggregationFailure {
    /// The holder the failure belongs to.
    #[must_use]
    pub fn holder(&self) -> HolderId {
        match self {
            Self::NoHoldings { holder }
            | Self::NoResolvableValues { holder }
            | Self::NoHoldingsWithEmbeddings { holder }
            | Self::DimensionMismatch { holder, .. } => *holder,
        }
    }
}
