//! Holder profiles and party-level aggregation of diversification metrics.

use std::collections::BTreeMap;

use holdmap_core::HolderId;
use serde::{Deserialize, Serialize};

use crate::metrics::DiversificationMetrics;
use crate::risk::RiskProfile;

/// Party label used when a holder has none.
pub const UNKNOWN_PARTY: &str = "Unknown";

/// Minimum weight for a sector to count as carried by a holder.
pub const SIGNIFICANT_WEIGHT: f64 = 0.1;

/// Number of sectors reported per party.
pub const TOP_SECTORS: usize = 5;

/// Descriptive data about a holder joined with their metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderProfile {
    /// The holder.
    pub holder_id: HolderId,
    /// Display name.
    pub name: String,
    /// Party label; blank reads as [`UNKNOWN_PARTY`].
    pub party: String,
    /// Chamber or office.
    #[serde(default)]
    pub chamber: String,
    /// State or district.
    #[serde(default)]
    pub state: String,
    /// Diversification metrics.
    pub metrics: DiversificationMetrics,
}

impl HolderProfile {
    /// Creates a profile.
    #[must_use]
    pub fn new(name: impl Into<String>, party: impl Into<String>, metrics: DiversificationMetrics) -> Self {
        Self {
            holder_id: metrics.holder_id,
            name: name.into(),
            party: party.into(),
            chamber: String::new(),
            state: String::new(),
            metrics,
        }
    }

    /// Sets chamber and state.
    #[must_use]
    pub fn with_office(mut self, chamber: impl Into<String>, state: impl Into<String>) -> Self {
        self.chamber = chamber.into();
        self.state = state.into();
        self
    }

    /// Party label with blanks mapped to [`UNKNOWN_PARTY`].
    #[must_use]
    pub fn party_label(&self) -> &str {
        let party = self.party.trim();
        if party.is_empty() {
            UNKNOWN_PARTY
        } else {
            party
        }
    }
}

/// Averages and distributions over one party's holders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPattern {
    /// Party label.
    pub party: String,
    /// Holders in the party.
    pub holder_count: usize,
    /// Mean sector HHI.
    pub avg_hhi: f64,
    /// Mean diversification score.
    pub avg_diversification_score: f64,
    /// Mean holding count.
    pub avg_asset_count: f64,
    /// Holders per risk profile.
    pub risk_distribution: BTreeMap<RiskProfile, usize>,
    /// Sectors most often held above [`SIGNIFICANT_WEIGHT`], with the
    /// number of holders carrying each. Ties are alphabetical.
    pub top_sectors: Vec<(String, usize)>,
}

/// Ranks `counts` by descending count, ties alphabetical, keeping `k`.
pub fn top_counts(counts: BTreeMap<String, usize>, k: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // stable sort keeps the BTreeMap's alphabetical order within equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);
    ranked
}

/// Groups profiles by party and summarizes each group.
#[must_use]
pub fn analyze_party_patterns(profiles: &[HolderProfile]) -> BTreeMap<String, PartyPattern> {
    let mut groups: BTreeMap<&str, Vec<&HolderProfile>> = BTreeMap::new();
    for profile in profiles {
        groups.entry(profile.party_label()).or_default().push(profile);
    }

    groups
        .into_iter()
        .map(|(party, members)| {
            let n = members.len() as f64;
            let mut risk_distribution = BTreeMap::new();
            let mut sector_counts: BTreeMap<String, usize> = BTreeMap::new();
            for m in &members {
                *risk_distribution.entry(m.metrics.risk_profile).or_insert(0) += 1;
                for (sector, weight) in &m.metrics.sector_weights {
                    if *weight > SIGNIFICANT_WEIGHT {
                        *sector_counts.entry(sector.clone()).or_insert(0) += 1;
                    }
                }
            }

            let pattern = PartyPattern {
                party: party.to_string(),
                holder_count: members.len(),
                avg_hhi: members.iter().map(|m| m.metrics.hhi).sum::<f64>() / n,
                avg_diversification_score: members
                    .iter()
                    .map(|m| m.metrics.diversification_score)
                    .sum::<f64>()
                    / n,
                avg_asset_count: members.iter().map(|m| m.metrics.total_assets as f64).sum::<f64>() / n,
                risk_distribution,
                top_sectors: top_counts(sector_counts, TOP_SECTORS),
            };
            (party.to_string(), pattern)
        })
        .collect()
}
