//! Value-weighted aggregation of product embeddings into portfolio vectors.
//!
//! A holder's portfolio vector is the average of its holdings' product
//! vectors, weighted by estimated value. Holdings that cannot contribute are
//! skipped and counted in [`PortfolioMetadata`]; a holder with nothing left
//! produces an [`AggregationFailure`] instead of a vector.

use std::collections::{BTreeMap, HashMap};

use holdmap_core::{
    is_zero_vector, AssetHolding, EmbeddingMethod, HolderId, PortfolioEmbedding, PortfolioMetadata,
    ProductEmbedding, ProductId,
};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AggregationConfig;
use crate::error::{AggregationFailure, AggregationResult};
use crate::parallel::maybe_parallel_map;
use crate::value::parse_asset_value;

/// Aggregation rule label stored in metadata.
pub const WEIGHTED_AVERAGE: &str = "weighted_average";

/// Product vectors keyed by product, for one method.
pub type EmbeddingIndex = HashMap<ProductId, Vec<f64>>;

/// Builds an [`EmbeddingIndex`] from stored rows, keeping only `method`.
#[must_use]
pub fn embedding_index(rows: &[ProductEmbedding], method: EmbeddingMethod) -> EmbeddingIndex {
    rows.iter()
        .filter(|row| row.method == method)
        .map(|row| (row.product_id, row.vector.clone()))
        .collect()
}

/// Returns true if `index` is an unresolved holding that names a container
/// of (or a child of) another holding of the same holder.
fn is_container(index: usize, names: &[String]) -> bool {
    let name = &names[index];
    if name.is_empty() {
        return false;
    }
    names.iter().enumerate().any(|(j, other)| {
        j != index && !other.is_empty() && other != name && (other.contains(name.as_str()) || name.contains(other.as_str()))
    })
}

struct Valued<'a> {
    holding: &'a AssetHolding,
    value: f64,
}

/// Aggregates one holder's holdings into a portfolio vector.
///
/// Steps:
/// 1. Unresolved values are dropped when the holding's name is contained in
///    (or contains) another holding's name, otherwise replaced by
///    [`AggregationConfig::default_value`].
/// 2. Holdings with a positive value are kept.
/// 3. Holdings without an embedding, or with an all-zero one, are skipped.
///    NaN components read as zero.
/// 4. The result is the value-weighted average of the remaining vectors.
///
/// # Errors
///
/// Returns the [`AggregationFailure`] describing why no vector could be built.
pub fn aggregate_portfolio(
    holder_id: HolderId,
    holdings: &[AssetHolding],
    embeddings: &EmbeddingIndex,
    method: EmbeddingMethod,
    config: &AggregationConfig,
) -> AggregationResult<PortfolioEmbedding> {
    if holdings.is_empty() {
        return Err(AggregationFailure::NoHoldings { holder: holder_id });
    }

    let mut metadata = PortfolioMetadata {
        base_method: method,
        aggregation: WEIGHTED_AVERAGE.to_string(),
        ..PortfolioMetadata::default()
    };

    let names: Vec<String> = holdings
        .iter()
        .map(|h| h.product_name.trim().to_lowercase())
        .collect();
    let default_value = config.default_value.to_f64().unwrap_or(0.0);

    let mut valued = Vec::with_capacity(holdings.len());
    for (i, holding) in holdings.iter().enumerate() {
        let value = match parse_asset_value(&holding.raw_value).as_f64() {
            Some(v) => v,
            None if is_container(i, &names) => {
                metadata.parents_skipped += 1;
                continue;
            }
            None => {
                metadata.defaulted_values += 1;
                default_value
            }
        };
        if value > 0.0 && value.is_finite() {
            valued.push(Valued { holding, value });
        }
    }

    if valued.is_empty() {
        return Err(AggregationFailure::NoResolvableValues { holder: holder_id });
    }

    let mut vectors: Vec<(Vec<f64>, f64)> = Vec::with_capacity(valued.len());
    let mut dimension: Option<usize> = None;
    for item in &valued {
        let Some(raw) = embeddings.get(&item.holding.product_id) else {
            metadata.missing_embeddings += 1;
            continue;
        };
        if is_zero_vector(raw) {
            metadata.zero_embeddings += 1;
            continue;
        }
        match dimension {
            Some(expected) if expected != raw.len() => {
                return Err(AggregationFailure::DimensionMismatch {
                    holder: holder_id,
                    expected,
                    actual: raw.len(),
                });
            }
            _ => dimension = Some(raw.len()),
        }
        let clean = raw.iter().map(|x| if x.is_nan() { 0.0 } else { *x }).collect();
        vectors.push((clean, item.value));
    }

    let Some(dim) = dimension else {
        return Err(AggregationFailure::NoHoldingsWithEmbeddings { holder: holder_id });
    };

    let total_value: f64 = vectors.iter().map(|(_, v)| v).sum();
    let mut vector = vec![0.0; dim];
    for (components, value) in &vectors {
        let weight = value / total_value;
        for (acc, x) in vector.iter_mut().zip(components) {
            *acc += weight * x;
        }
    }

    debug!(
        holder = holder_id.get(),
        assets = vectors.len(),
        parents_skipped = metadata.parents_skipped,
        "aggregated portfolio"
    );

    Ok(PortfolioEmbedding {
        holder_id,
        method: method.portfolio_label(),
        vector,
        asset_count: vectors.len(),
        total_value,
        metadata,
    })
}

/// Result of aggregating many holders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationRun {
    /// Portfolio vectors, ordered by holder id.
    pub embeddings: Vec<PortfolioEmbedding>,
    /// Holders that produced no vector, with the reason.
    pub failures: Vec<AggregationFailure>,
    /// Holders with a vector.
    pub processed: usize,
    /// Holders without one.
    pub skipped: usize,
}

impl AggregationRun {
    /// Finds the portfolio vector of `holder`.
    #[must_use]
    pub fn get(&self, holder: HolderId) -> Option<&PortfolioEmbedding> {
        self.embeddings.iter().find(|e| e.holder_id == holder)
    }
}

/// Aggregates every holder's portfolio.
///
/// Uses parallel iteration above the configured threshold. Per-holder
/// failures are collected, never propagated.
#[must_use]
pub fn aggregate_portfolios(
    holdings_by_holder: &BTreeMap<HolderId, Vec<AssetHolding>>,
    embeddings: &EmbeddingIndex,
    method: EmbeddingMethod,
    config: &AggregationConfig,
) -> AggregationRun {
    let holders: Vec<(&HolderId, &Vec<AssetHolding>)> = holdings_by_holder.iter().collect();
    info!(holders = holders.len(), method = %method, "aggregating portfolios");

    let results = maybe_parallel_map(&holders, config, |(holder, holdings)| {
        aggregate_portfolio(**holder, holdings, embeddings, method, config)
    });

    let mut run = AggregationRun::default();
    for result in results {
        match result {
            Ok(embedding) => {
                run.processed += 1;
                run.embeddings.push(embedding);
            }
            Err(failure) => {
                debug!(holder = failure.holder().get(), reason = %failure, "holder skipped");
                run.skipped += 1;
                run.failures.push(failure);
            }
        }
    }

    if run.processed == 0 && !holders.is_empty() {
        warn!(method = %method, "no portfolio could be aggregated");
    }
    info!(processed = run.processed, skipped = run.skipped, "aggregation finished");
    run
}
