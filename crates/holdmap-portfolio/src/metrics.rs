//! Sector concentration and diversification metrics.
//!
//! All weight functions normalize their input, so raw counts or amounts can
//! be passed directly. Empty or all-zero input yields zero.

use std::collections::{BTreeMap, HashMap};

use holdmap_core::{AssetHolding, HolderId, ProductId, ProductRecord};
use serde::{Deserialize, Serialize};

use crate::risk::{classify_risk, RiskProfile, RiskScheme};
use crate::value::parse_asset_value;

/// Label used for holdings whose product has no sector.
pub const UNCLASSIFIED_SECTOR: &str = "Unknown";

fn normalized(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some(
        weights
            .iter()
            .map(|w| if *w > 0.0 { w / total } else { 0.0 })
            .collect(),
    )
}

/// Herfindahl-Hirschman index: sum of squared normalized weights.
///
/// Ranges from `1/n` for `n` equal weights to `1` for a single holding.
#[must_use]
pub fn herfindahl_index(weights: &[f64]) -> f64 {
    normalized(weights).map_or(0.0, |w| w.iter().map(|p| p * p).sum())
}

/// Shannon entropy (natural log) of the normalized weights.
#[must_use]
pub fn shannon_entropy(weights: &[f64]) -> f64 {
    normalized(weights).map_or(0.0, |w| {
        -w.iter().filter(|p| **p > 0.0).map(|p| p * p.ln()).sum::<f64>()
    })
}

/// Diversification score on a 0-100 scale, rounded to one decimal.
///
/// 70 points for low concentration (`1 - HHI`) and 30 for breadth, full
/// marks at eight or more positive weights.
#[must_use]
pub fn diversification_score(weights: &[f64]) -> f64 {
    let active = weights.iter().filter(|w| **w > 0.0).count();
    if active == 0 {
        return 0.0;
    }
    let breadth = (active as f64 / 8.0).min(1.0);
    let score = (1.0 - herfindahl_index(weights)) * 70.0 + breadth * 30.0;
    (score * 10.0).round() / 10.0
}

/// Concentration across industries, alongside the sector view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryConcentration {
    /// Industry HHI.
    pub hhi: f64,
    /// Industry entropy.
    pub entropy: f64,
    /// Industries with positive weight.
    pub industry_count: usize,
}

/// Diversification profile of one holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationMetrics {
    /// The holder.
    pub holder_id: HolderId,
    /// Normalized sector weights.
    pub sector_weights: BTreeMap<String, f64>,
    /// Sector HHI.
    pub hhi: f64,
    /// Sector entropy.
    pub entropy: f64,
    /// Largest sector (alphabetical first on ties).
    pub dominant_sector: Option<String>,
    /// Weight of the dominant sector.
    pub concentration_ratio: f64,
    /// Sectors with positive weight.
    pub sector_count: usize,
    /// See [`diversification_score`].
    pub diversification_score: f64,
    /// Risk label.
    pub risk_profile: RiskProfile,
    /// Holdings behind the weights, when known.
    pub total_assets: usize,
    /// Industry view, when supplied.
    pub industry: Option<IndustryConcentration>,
}

impl DiversificationMetrics {
    /// Builds metrics from sector weights (any non-negative scale).
    #[must_use]
    pub fn from_sector_weights(holder_id: HolderId, weights: &BTreeMap<String, f64>, scheme: RiskScheme) -> Self {
        let raw: Vec<f64> = weights.values().copied().collect();
        let Some(norm) = normalized(&raw) else {
            return Self::empty(holder_id);
        };

        let sector_weights: BTreeMap<String, f64> = weights
            .keys()
            .cloned()
            .zip(norm.iter().copied())
            .filter(|(_, w)| *w > 0.0)
            .collect();

        let mut dominant: Option<(&String, f64)> = None;
        for (name, w) in &sector_weights {
            if dominant.map_or(true, |(_, best)| *w > best) {
                dominant = Some((name, *w));
            }
        }
        let (dominant_sector, concentration_ratio) =
            dominant.map_or((None, 0.0), |(n, w)| (Some(n.clone()), w));

        let hhi = herfindahl_index(&norm);
        let sector_count = sector_weights.len();
        Self {
            holder_id,
            hhi,
            entropy: shannon_entropy(&norm),
            dominant_sector,
            concentration_ratio,
            sector_count,
            diversification_score: diversification_score(&norm),
            risk_profile: classify_risk(hhi, sector_count, concentration_ratio, scheme),
            total_assets: 0,
            industry: None,
            sector_weights,
        }
    }

    /// Builds metrics from per-sector holding counts.
    #[must_use]
    pub fn from_sector_counts(holder_id: HolderId, counts: &BTreeMap<String, usize>, scheme: RiskScheme) -> Self {
        let weights: BTreeMap<String, f64> = counts.iter().map(|(k, v)| (k.clone(), *v as f64)).collect();
        let mut metrics = Self::from_sector_weights(holder_id, &weights, scheme);
        metrics.total_assets = counts.values().sum();
        metrics
    }

    /// Builds metrics from an exposure tally.
    #[must_use]
    pub fn from_exposure(holder_id: HolderId, exposure: &SectorExposure, scheme: RiskScheme) -> Self {
        let mut metrics = Self::from_sector_weights(holder_id, exposure.totals(), scheme);
        metrics.total_assets = exposure.asset_count();
        metrics
    }

    /// Metrics for a holder with no sector data.
    #[must_use]
    pub fn empty(holder_id: HolderId) -> Self {
        Self {
            holder_id,
            sector_weights: BTreeMap::new(),
            hhi: 0.0,
            entropy: 0.0,
            dominant_sector: None,
            concentration_ratio: 0.0,
            sector_count: 0,
            diversification_score: 0.0,
            risk_profile: RiskProfile::Unknown,
            total_assets: 0,
            industry: None,
        }
    }

    /// Sets the holding count.
    #[must_use]
    pub fn with_total_assets(mut self, total: usize) -> Self {
        self.total_assets = total;
        self
    }

    /// Adds the industry view from industry weights or counts.
    #[must_use]
    pub fn with_industry_weights(mut self, weights: &BTreeMap<String, f64>) -> Self {
        let raw: Vec<f64> = weights.values().copied().collect();
        self.industry = Some(IndustryConcentration {
            hhi: herfindahl_index(&raw),
            entropy: shannon_entropy(&raw),
            industry_count: raw.iter().filter(|w| **w > 0.0).count(),
        });
        self
    }

    /// Weight of `sector`, zero when absent.
    #[must_use]
    pub fn sector_weight(&self, sector: &str) -> f64 {
        self.sector_weights.get(sector).copied().unwrap_or(0.0)
    }
}

/// Per-sector tally of a holder's holdings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorExposure {
    totals: BTreeMap<String, f64>,
    asset_count: usize,
}

impl SectorExposure {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `sector`. Blank sectors count as [`UNCLASSIFIED_SECTOR`];
    /// non-positive or non-finite amounts are ignored.
    pub fn add(&mut self, sector: &str, amount: f64) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        let key = if sector.trim().is_empty() {
            UNCLASSIFIED_SECTOR
        } else {
            sector.trim()
        };
        *self.totals.entry(key.to_string()).or_insert(0.0) += amount;
        self.asset_count += 1;
    }

    /// One unit per sector occurrence.
    #[must_use]
    pub fn from_sectors<'a, I>(sectors: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut exposure = Self::new();
        for sector in sectors {
            exposure.add(sector, 1.0);
        }
        exposure
    }

    /// Counts holdings per product sector. Holdings whose product is unknown
    /// are skipped.
    #[must_use]
    pub fn by_asset_count(holdings: &[AssetHolding], products: &HashMap<ProductId, ProductRecord>) -> Self {
        Self::from_sectors(
            holdings
                .iter()
                .filter_map(|h| products.get(&h.product_id))
                .map(|p| p.sector.as_str()),
        )
    }

    /// Sums estimated holding values per product sector. Unresolved values
    /// and unknown products are skipped.
    #[must_use]
    pub fn by_value(holdings: &[AssetHolding], products: &HashMap<ProductId, ProductRecord>) -> Self {
        let mut exposure = Self::new();
        for holding in holdings {
            let Some(product) = products.get(&holding.product_id) else {
                continue;
            };
            if let Some(value) = parse_asset_value(&holding.raw_value).as_f64() {
                exposure.add(&product.sector, value);
            }
        }
        exposure
    }

    /// Raw totals per sector.
    #[must_use]
    pub fn totals(&self) -> &BTreeMap<String, f64> {
        &self.totals
    }

    /// Holdings added.
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.asset_count
    }

    /// Returns true if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_hhi_reference_values() {
        assert_relative_eq!(herfindahl_index(&[0.25; 4]), 0.25);
        assert_relative_eq!(herfindahl_index(&[1.0]), 1.0);
        assert_relative_eq!(herfindahl_index(&[3.0, 1.0]), 0.625);
        assert_relative_eq!(herfindahl_index(&[]), 0.0);
        assert_relative_eq!(herfindahl_index(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_entropy_reference_values() {
        assert_relative_eq!(shannon_entropy(&[1.0]), 0.0);
        assert_relative_eq!(shannon_entropy(&[1.0; 4]), 4.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(shannon_entropy(&[0.5, 0.3, 0.2]), 1.029653, epsilon = 1e-6);
        assert_relative_eq!(shannon_entropy(&[0.5, 0.0, 0.5]), 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_diversification_score() {
        assert_relative_eq!(diversification_score(&[1.0]), 3.8);
        assert_relative_eq!(diversification_score(&[1.0; 8]), 91.3);
        assert_relative_eq!(diversification_score(&[]), 0.0);
    }

    #[test]
    fn test_metrics_from_counts() {
        let counts: BTreeMap<String, usize> =
            [("Technology", 6usize), ("Energy", 2), ("Healthcare", 2)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
        let m = DiversificationMetrics::from_sector_counts(HolderId(1), &counts, RiskScheme::Concentration);

        assert_eq!(m.total_assets, 10);
        assert_eq!(m.sector_count, 3);
        assert_eq!(m.dominant_sector.as_deref(), Some("Technology"));
        assert_relative_eq!(m.concentration_ratio, 0.6, epsilon = 1e-12);
        assert_relative_eq!(m.hhi, 0.44, epsilon = 1e-12);
        assert_eq!(m.risk_profile, RiskProfile::Focused);
        assert_relative_eq!(m.sector_weight("Energy"), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_dominant_tie_is_alphabetical() {
        let m = DiversificationMetrics::from_sector_weights(
            HolderId(1),
            &weights(&[("Utilities", 0.5), ("Energy", 0.5)]),
            RiskScheme::Concentration,
        );
        assert_eq!(m.dominant_sector.as_deref(), Some("Energy"));
    }

    #[test]
    fn test_empty_metrics() {
        let m = DiversificationMetrics::from_sector_weights(HolderId(2), &BTreeMap::new(), RiskScheme::Concentration);
        assert_eq!(m.risk_profile, RiskProfile::Unknown);
        assert!(m.dominant_sector.is_none());
        assert_eq!(m.sector_count, 0);
    }

    #[test]
    fn test_industry_view() {
        let m = DiversificationMetrics::empty(HolderId(3))
            .with_industry_weights(&weights(&[("Software", 1.0), ("Banks", 1.0)]));
        let industry = m.industry.unwrap();
        assert_eq!(industry.industry_count, 2);
        assert_relative_eq!(industry.hhi, 0.5);
    }

    #[test]
    fn test_exposure_by_value_and_count() {
        let products: HashMap<ProductId, ProductRecord> = [
            ProductRecord::builder(1, "Apple Inc").sector("Technology").build(),
            ProductRecord::builder(2, "Exxon Mobil").sector("Energy").build(),
            ProductRecord::new(3, "Mystery Trust"),
        ]
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
        let holdings = vec![
            AssetHolding::new(HolderId(1), ProductId(1), "Apple Inc", "$1,001 - $15,000"),
            AssetHolding::new(HolderId(1), ProductId(2), "Exxon Mobil", "$15,001 - $50,000"),
            AssetHolding::new(HolderId(1), ProductId(3), "Mystery Trust", "None"),
            AssetHolding::new(HolderId(1), ProductId(99), "Gone", "$5,000"),
        ];

        let count = SectorExposure::by_asset_count(&holdings, &products);
        assert_eq!(count.asset_count(), 3);
        assert_relative_eq!(count.totals()[UNCLASSIFIED_SECTOR], 1.0);

        let value = SectorExposure::by_value(&holdings, &products);
        assert_eq!(value.asset_count(), 2);
        assert_relative_eq!(value.totals()["Energy"], 32500.5);

        let m = DiversificationMetrics::from_exposure(HolderId(1), &value, RiskScheme::Concentration);
        assert_eq!(m.dominant_sector.as_deref(), Some("Energy"));
        assert_eq!(m.total_assets, 2);
    }
}
