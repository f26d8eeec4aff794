//! Traded product records as enriched by the storage layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::ProductId;

fn default_currency() -> String {
    "USD".to_string()
}

/// A traded financial product referenced by disclosed holdings.
///
/// Categorical attributes are free text as delivered by enrichment; missing
/// values are empty strings. Missing numeric attributes are `None` and read
/// as `0.0` by the feature accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Storage identifier.
    pub id: ProductId,

    /// Display name as disclosed.
    pub name: String,

    /// Product type (stock, fund, bond, ...).
    #[serde(default)]
    pub product_type: String,

    /// Sector classification.
    #[serde(default)]
    pub sector: String,

    /// Industry classification.
    #[serde(default)]
    pub industry: String,

    /// Asset class (equity, fixed income, ...).
    #[serde(default)]
    pub asset_class: String,

    /// Market capitalization tier (large, mid, small, ...).
    #[serde(default)]
    pub market_cap_tier: String,

    /// Provider risk rating.
    #[serde(default)]
    pub risk_rating: String,

    /// Country of domicile.
    #[serde(default)]
    pub country: String,

    /// Trading currency.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Market capitalization.
    #[serde(default)]
    pub market_cap: Option<f64>,

    /// Beta against the broad market.
    #[serde(default)]
    pub beta: Option<f64>,

    /// Dividend yield (decimal).
    #[serde(default)]
    pub dividend_yield: Option<f64>,

    /// Expense ratio for funds (decimal).
    #[serde(default)]
    pub expense_ratio: Option<f64>,

    /// Exchange-traded fund flag.
    #[serde(default)]
    pub is_etf: bool,

    /// Mutual fund flag.
    #[serde(default)]
    pub is_mutual_fund: bool,

    /// Index fund flag.
    #[serde(default)]
    pub is_index_fund: bool,
}

impl ProductRecord {
    /// Creates a record with only identity and name set.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            product_type: String::new(),
            sector: String::new(),
            industry: String::new(),
            asset_class: String::new(),
            market_cap_tier: String::new(),
            risk_rating: String::new(),
            country: String::new(),
            currency: default_currency(),
            market_cap: None,
            beta: None,
            dividend_yield: None,
            expense_ratio: None,
            is_etf: false,
            is_mutual_fund: false,
            is_index_fund: false,
        }
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder(id: u64, name: impl Into<String>) -> ProductRecordBuilder {
        ProductRecordBuilder {
            record: Self::new(id, name),
        }
    }

    /// Text attributes used by the text-based methods, empty entries removed.
    #[must_use]
    pub fn text_features(&self) -> Vec<&str> {
        [
            self.name.as_str(),
            self.sector.as_str(),
            self.industry.as_str(),
            self.asset_class.as_str(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect()
    }

    /// Categorical attributes keyed by feature name (sorted).
    #[must_use]
    pub fn categorical_features(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("asset_class", self.asset_class.as_str()),
            ("country", self.country.as_str()),
            ("currency", self.currency.as_str()),
            ("industry", self.industry.as_str()),
            ("market_cap_tier", self.market_cap_tier.as_str()),
            ("risk_rating", self.risk_rating.as_str()),
            ("sector", self.sector.as_str()),
            ("type", self.product_type.as_str()),
        ])
    }

    /// Numeric attributes keyed by feature name (sorted). Flags are 0/1.
    #[must_use]
    pub fn numerical_features(&self) -> BTreeMap<&'static str, f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let num = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);
        BTreeMap::from([
            ("beta", num(self.beta)),
            ("dividend_yield", num(self.dividend_yield)),
            ("expense_ratio", num(self.expense_ratio)),
            ("is_etf", flag(self.is_etf)),
            ("is_index_fund", flag(self.is_index_fund)),
            ("is_mutual_fund", flag(self.is_mutual_fund)),
            ("market_cap", num(self.market_cap)),
        ])
    }
}

/// Builder for [`ProductRecord`].
#[derive(Debug, Clone)]
pub struct ProductRecordBuilder {
    record: ProductRecord,
}

impl ProductRecordBuilder {
    /// Sets the product type.
    #[must_use]
    pub fn product_type(mut self, value: impl Into<String>) -> Self {
        self.record.product_type = value.into();
        self
    }

    /// Sets the sector.
    #[must_use]
    pub fn sector(mut self, value: impl Into<String>) -> Self {
        self.record.sector = value.into();
        self
    }

    /// Sets the industry.
    #[must_use]
    pub fn industry(mut self, value: impl Into<String>) -> Self {
        self.record.industry = value.into();
        self
    }

    /// Sets the asset class.
    #[must_use]
    pub fn asset_class(mut self, value: impl Into<String>) -> Self {
        self.record.asset_class = value.into();
        self
    }

    /// Sets the market-cap tier.
    #[must_use]
    pub fn market_cap_tier(mut self, value: impl Into<String>) -> Self {
        self.record.market_cap_tier = value.into();
        self
    }

    /// Sets the risk rating.
    #[must_use]
    pub fn risk_rating(mut self, value: impl Into<String>) -> Self {
        self.record.risk_rating = value.into();
        self
    }

    /// Sets the country.
    #[must_use]
    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.record.country = value.into();
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn currency(mut self, value: impl Into<String>) -> Self {
        self.record.currency = value.into();
        self
    }

    /// Sets the market capitalization.
    #[must_use]
    pub fn market_cap(mut self, value: f64) -> Self {
        self.record.market_cap = Some(value);
        self
    }

    /// Sets beta.
    #[must_use]
    pub fn beta(mut self, value: f64) -> Self {
        self.record.beta = Some(value);
        self
    }

    /// Sets the dividend yield.
    #[must_use]
    pub fn dividend_yield(mut self, value: f64) -> Self {
        self.record.dividend_yield = Some(value);
        self
    }

    /// Sets the expense ratio.
    #[must_use]
    pub fn expense_ratio(mut self, value: f64) -> Self {
        self.record.expense_ratio = Some(value);
        self
    }

    /// Sets the fund-type flags.
    #[must_use]
    pub fn fund_flags(mut self, etf: bool, mutual_fund: bool, index_fund: bool) -> Self {
        self.record.is_etf = etf;
        self.record.is_mutual_fund = mutual_fund;
        self.record.is_index_fund = index_fund;
        self
    }

    /// Finishes the record.
    #[must_use]
    pub fn build(self) -> ProductRecord {
        self.record
    }
}
