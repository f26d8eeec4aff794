//! Cluster summaries and validation statistics.

use std::collections::{BTreeMap, HashMap};

use holdmap_core::HolderId;
use holdmap_portfolio::party::{top_counts, HolderProfile};
use holdmap_portfolio::RiskProfile;
use serde::{Deserialize, Serialize};

use crate::cluster::ClusterAssignment;

/// Default number of dominant sectors listed per cluster.
pub const DEFAULT_TOP_SECTORS: usize = 3;

/// Description of one cluster's members.
///
/// Averages and distributions cover the members that have a profile;
/// `size` and `members` cover every assigned holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cluster id.
    pub cluster_id: usize,
    /// Number of assigned holders.
    pub size: usize,
    /// Grid cell `(x, y)`.
    pub grid_position: (usize, usize),
    /// Assigned holders, in assignment order.
    pub members: Vec<HolderId>,
    /// Holders per party.
    pub party_distribution: BTreeMap<String, usize>,
    /// Holders per risk profile.
    pub risk_distribution: BTreeMap<RiskProfile, usize>,
    /// Mean sector HHI.
    pub avg_hhi: f64,
    /// Mean sector entropy.
    pub avg_entropy: f64,
    /// Mean holding count.
    pub avg_asset_count: f64,
    /// Most frequent dominant sectors, ties alphabetical.
    pub top_sectors: Vec<(String, usize)>,
}

fn mean_of<F>(profiles: &[&HolderProfile], f: F) -> f64
where
    F: Fn(&HolderProfile) -> f64,
{
    if profiles.is_empty() {
        return 0.0;
    }
    profiles.iter().map(|p| f(p)).sum::<f64>() / profiles.len() as f64
}

/// Groups assignments by cluster and joins holder profiles.
///
/// Summaries are ordered by cluster id.
#[must_use]
pub fn summarize_clusters(
    assignments: &[ClusterAssignment],
    profiles: &[HolderProfile],
    top_k: usize,
) -> Vec<ClusterSummary> {
    let by_holder: HashMap<HolderId, &HolderProfile> =
        profiles.iter().map(|p| (p.holder_id, p)).collect();

    let mut clusters: BTreeMap<usize, Vec<&ClusterAssignment>> = BTreeMap::new();
    for assignment in assignments {
        clusters.entry(assignment.cluster_id).or_default().push(assignment);
    }

    clusters
        .into_iter()
        .map(|(id, members)| {
            let profiled: Vec<&HolderProfile> = members
                .iter()
                .filter_map(|a| by_holder.get(&a.holder_id).copied())
                .collect();

            let mut party_distribution = BTreeMap::new();
            let mut risk_distribution = BTreeMap::new();
            let mut dominant: BTreeMap<String, usize> = BTreeMap::new();
            for p in &profiled {
                *party_distribution.entry(p.party_label().to_string()).or_insert(0) += 1;
                *risk_distribution.entry(p.metrics.risk_profile).or_insert(0) += 1;
                if let Some(sector) = &p.metrics.dominant_sector {
                    *dominant.entry(sector.clone()).or_insert(0) += 1;
                }
            }

            ClusterSummary {
                cluster_id: id,
                size: members.len(),
                grid_position: (members[0].grid_x, members[0].grid_y),
                members: members.iter().map(|a| a.holder_id).collect(),
                party_distribution,
                risk_distribution,
                avg_hhi: mean_of(&profiled, |p| p.metrics.hhi),
                avg_entropy: mean_of(&profiled, |p| p.metrics.entropy),
                avg_asset_count: mean_of(&profiled, |p| p.metrics.total_assets as f64),
                top_sectors: top_counts(dominant, top_k),
            }
        })
        .collect()
}

/// Size statistics over a set of assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Holders assigned.
    pub total_holders: usize,
    /// Distinct non-empty clusters.
    pub cluster_count: usize,
    /// Mean holders per non-empty cluster.
    pub avg_cluster_size: f64,
    /// Largest cluster size.
    pub largest_cluster: usize,
    /// Smallest non-empty cluster size.
    pub smallest_cluster: usize,
}

impl ValidationMetrics {
    /// Computes size statistics. Empty input yields all zeros.
    #[must_use]
    pub fn from_assignments(assignments: &[ClusterAssignment]) -> Self {
        let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
        for a in assignments {
            *sizes.entry(a.cluster_id).or_insert(0) += 1;
        }
        if sizes.is_empty() {
            return Self::default();
        }
        Self {
            total_holders: assignments.len(),
            cluster_count: sizes.len(),
            avg_cluster_size: assignments.len() as f64 / sizes.len() as f64,
            largest_cluster: sizes.values().copied().max().unwrap_or(0),
            smallest_cluster: sizes.values().copied().min().unwrap_or(0),
        }
    }
}
