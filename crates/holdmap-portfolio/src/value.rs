//! Disclosed value parsing.
//!
//! Financial disclosures report holdings as ranges (`"$15,001 - $50,000"`),
//! single amounts, or fixed phrases. [`parse_asset_value`] turns that text
//! into an estimate; text it cannot read is [`ValueEstimate::Unresolved`],
//! never zero.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Digit runs with thousands separators.
static AMOUNT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d[\d,]*").ok());

/// Fixed phrases and the estimate each stands for. Checked in order.
const QUALITATIVE: [(&str, Decimal); 3] = [
    ("none (or less than $1,001)", dec!(500)),
    ("over $1,000,000", dec!(1500000)),
    ("unascertainable", dec!(50000)),
];

/// Markers of a missing value.
const EMPTY_MARKERS: [&str; 4] = ["", "none", "null", "n/a"];

/// Estimated value of a disclosed holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueEstimate {
    /// A fixed phrase such as `"Over $1,000,000"`.
    Qualitative(Decimal),

    /// Midpoint of a disclosed range.
    RangeMidpoint(Decimal),

    /// A single dollar amount.
    Single(Decimal),

    /// A number without a currency marker.
    Bare(Decimal),

    /// Nothing usable in the text.
    Unresolved,
}

impl ValueEstimate {
    /// The estimated amount, if resolved.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Qualitative(v) | Self::RangeMidpoint(v) | Self::Single(v) | Self::Bare(v) => {
                Some(*v)
            }
            Self::Unresolved => None,
        }
    }

    /// The estimated amount as `f64`, if resolved.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.amount().and_then(|v| v.to_f64())
    }

    /// Returns true if no amount could be read.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

fn parse_amount(digits: &str) -> Option<Decimal> {
    Decimal::from_str(&digits.replace(',', "")).ok()
}

fn amounts(text: &str) -> Vec<Decimal> {
    let Some(pattern) = AMOUNT.as_ref() else {
        return Vec::new();
    };
    pattern
        .find_iter(text)
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

fn parse_bare(text: &str) -> Option<Decimal> {
    let cleaned = text.replace(',', "");
    if let Ok(v) = Decimal::from_str(&cleaned) {
        return Some(v);
    }
    let float: f64 = cleaned.parse().ok()?;
    if float.is_finite() {
        Decimal::try_from(float).ok()
    } else {
        None
    }
}

/// Parses disclosed value text into an estimate.
///
/// Rules, first match wins:
/// 1. empty, `none`, `null` or `n/a` is unresolved;
/// 2. a known phrase maps to its fixed estimate;
/// 3. text with `" - "` and `$` and two amounts is the midpoint of the first two;
/// 4. text with `$` is its first amount;
/// 5. a bare number is taken as is.
///
/// Negative bare numbers are unresolved.
///
/// # Example
///
/// ```rust
/// use holdmap_portfolio::value::{parse_asset_value, ValueEstimate};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     parse_asset_value("$1,001 - $15,000"),
///     ValueEstimate::RangeMidpoint(dec!(8000.5))
/// );
/// assert!(parse_asset_value("N/A").is_unresolved());
/// ```
#[must_use]
pub fn parse_asset_value(text: &str) -> ValueEstimate {
    let clean = text.trim().to_lowercase();
    if EMPTY_MARKERS.contains(&clean.as_str()) {
        return ValueEstimate::Unresolved;
    }

    if let Some((_, v)) = QUALITATIVE.iter().find(|(phrase, _)| clean.contains(phrase)) {
        return ValueEstimate::Qualitative(*v);
    }

    if clean.contains('$') {
        let found = amounts(&clean);
        if clean.contains(" - ") && found.len() >= 2 {
            return ValueEstimate::RangeMidpoint((found[0] + found[1]) / dec!(2));
        }
        return match found.first() {
            Some(v) => ValueEstimate::Single(*v),
            None => ValueEstimate::Unresolved,
        };
    }

    match parse_bare(&clean) {
        Some(v) if v >= Decimal::ZERO => ValueEstimate::Bare(v),
        _ => ValueEstimate::Unresolved,
    }
}
