//! Risk profile classification from concentration metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk label assigned to a portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskProfile {
    /// One sector dominates.
    Concentrated,
    /// Many sectors with low concentration.
    Diversified,
    /// A leading sector without full concentration.
    Focused,
    /// Neither concentrated nor broadly spread.
    Balanced,
    /// Strategy scheme: concentrated bets.
    Aggressive,
    /// Strategy scheme: broad, low-concentration holdings.
    Conservative,
    /// No sector data.
    Unknown,
}

impl RiskProfile {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Concentrated => "Concentrated",
            Self::Diversified => "Diversified",
            Self::Focused => "Focused",
            Self::Balanced => "Balanced",
            Self::Aggressive => "Aggressive",
            Self::Conservative => "Conservative",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold set used by [`classify_risk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskScheme {
    /// Concentrated / Diversified / Focused / Balanced.
    #[default]
    Concentration,

    /// Aggressive / Conservative / Balanced.
    Strategy,
}

/// Classifies a portfolio from its sector HHI, sector count and the weight
/// of its dominant sector.
///
/// ```rust
/// use holdmap_portfolio::risk::{classify_risk, RiskProfile, RiskScheme};
///
/// assert_eq!(classify_risk(0.55, 3, 0.5, RiskScheme::Concentration), RiskProfile::Concentrated);
/// assert_eq!(classify_risk(0.2, 7, 0.2, RiskScheme::Concentration), RiskProfile::Diversified);
/// ```
#[must_use]
pub fn classify_risk(hhi: f64, sector_count: usize, dominant_weight: f64, scheme: RiskScheme) -> RiskProfile {
    match scheme {
        RiskScheme::Concentration => {
            if dominant_weight > 0.7 || hhi > 0.5 {
                RiskProfile::Concentrated
            } else if sector_count >= 6 && hhi < 0.25 {
                RiskProfile::Diversified
            } else if dominant_weight > 0.4 {
                RiskProfile::Focused
            } else {
                RiskProfile::Balanced
            }
        }
        RiskScheme::Strategy => {
            if dominant_weight > 0.6 || hhi > 0.5 {
                RiskProfile::Aggressive
            } else if sector_count >= 5 && hhi < 0.3 {
                RiskProfile::Conservative
            } else {
                RiskProfile::Balanced
            }
        }
    }
}
