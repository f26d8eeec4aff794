//! Fixed-layout feature vectors built from diversification metrics.
//!
//! Layout: one weight per sector in the caller's sector order, then
//! `hhi`, `entropy`, `sector_count / 10`, `concentration_ratio` and
//! `ln(1 + total_assets) / 10`.

use std::collections::BTreeSet;

use crate::metrics::DiversificationMetrics;

/// Names of the trailing summary features.
pub const SUMMARY_FEATURES: [&str; 5] = [
    "hhi",
    "entropy",
    "sector_count",
    "concentration_ratio",
    "log_total_assets",
];

/// Sorted union of the sectors seen across `metrics`.
#[must_use]
pub fn collect_sectors(metrics: &[DiversificationMetrics]) -> Vec<String> {
    metrics
        .iter()
        .flat_map(|m| m.sector_weights.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Builds the feature vector of one holder.
#[must_use]
pub fn portfolio_feature_vector(
    metrics: &DiversificationMetrics,
    all_sectors: &[String],
    total_assets: usize,
) -> Vec<f64> {
    let mut features: Vec<f64> = all_sectors.iter().map(|s| metrics.sector_weight(s)).collect();
    features.extend([
        metrics.hhi,
        metrics.entropy,
        metrics.sector_count as f64 / 10.0,
        metrics.concentration_ratio,
        (total_assets as f64).ln_1p() / 10.0,
    ]);
    features
}

/// Column names matching [`portfolio_feature_vector`].
#[must_use]
pub fn feature_names(all_sectors: &[String]) -> Vec<String> {
    all_sectors
        .iter()
        .map(|s| format!("sector_{s}"))
        .chain(SUMMARY_FEATURES.iter().map(|s| (*s).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskScheme;
    use approx::assert_relative_eq;
    use holdmap_core::HolderId;
    use std::collections::BTreeMap;

    fn metrics(pairs: &[(&str, f64)]) -> DiversificationMetrics {
        let weights: BTreeMap<String, f64> = pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect();
        DiversificationMetrics::from_sector_weights(HolderId(1), &weights, RiskScheme::Concentration)
    }

    #[test]
    fn test_layout() {
        let m = metrics(&[("Technology", 3.0), ("Energy", 1.0)]);
        let sectors = vec!["Energy".to_string(), "Healthcare".to_string(), "Technology".to_string()];
        let v = portfolio_feature_vector(&m, &sectors, 9);

        assert_eq!(v.len(), sectors.len() + SUMMARY_FEATURES.len());
        assert_relative_eq!(v[0], 0.25);
        assert_relative_eq!(v[1], 0.0);
        assert_relative_eq!(v[2], 0.75);
        assert_relative_eq!(v[3], 0.625);
        assert_relative_eq!(v[5], 0.2);
        assert_relative_eq!(v[6], 0.75);
        assert_relative_eq!(v[7], 10.0_f64.ln() / 10.0);
    }

    #[test]
    fn test_names_align_with_vector() {
        let sectors = vec!["Energy".to_string()];
        let names = feature_names(&sectors);
        assert_eq!(names[0], "sector_Energy");
        assert_eq!(names.last().map(String::as_str), Some("log_total_assets"));
        assert_eq!(names.len(), portfolio_feature_vector(&metrics(&[]), &sectors, 0).len());
    }

    #[test]
    fn test_collect_sectors() {
        let all = collect_sectors(&[
            metrics(&[("Utilities", 1.0), ("Energy", 1.0)]),
            metrics(&[("Energy", 2.0), ("Financials", 1.0)]),
        ]);
        assert_eq!(all, vec!["Energy", "Financials", "Utilities"]);
    }
}
