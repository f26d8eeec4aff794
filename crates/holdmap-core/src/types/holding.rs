//! Disclosed asset holdings.

use serde::{Deserialize, Serialize};

use crate::ids::{HolderId, ProductId};

/// A single disclosed holding as parsed from a financial-disclosure report.
///
/// Values stay as the raw disclosed text; resolving them to an amount is the
/// aggregator's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    /// The office-holder who disclosed this asset.
    pub holder_id: HolderId,

    /// The product this holding refers to.
    pub product_id: ProductId,

    /// Product name as disclosed; used for container/child detection.
    pub product_name: String,

    /// Raw value text, e.g. `"$15,001 - $50,000"`.
    pub raw_value: String,

    /// Owner label (self, spouse, joint, dependent child).
    #[serde(default)]
    pub owner: String,

    /// Disclosed income type (dividends, capital gains, ...).
    #[serde(default)]
    pub income_type: String,

    /// Raw income amount text.
    #[serde(default)]
    pub income_amount: String,

    /// Row index of the enclosing holding for hierarchical sub-holdings.
    #[serde(default)]
    pub parent_index: Option<usize>,
}

impl AssetHolding {
    /// Creates a holding with the fields the numeric pipeline reads.
    #[must_use]
    pub fn new(
        holder_id: HolderId,
        product_id: ProductId,
        product_name: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            holder_id,
            product_id,
            product_name: product_name.into(),
            raw_value: raw_value.into(),
            owner: String::new(),
            income_type: String::new(),
            income_amount: String::new(),
            parent_index: None,
        }
    }

    /// Sets the owner label.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Sets the income fields.
    #[must_use]
    pub fn with_income(mut self, income_type: impl Into<String>, amount: impl Into<String>) -> Self {
        self.income_type = income_type.into();
        self.income_amount = amount.into();
        self
    }

    /// Marks this holding as a sub-holding of another row.
    #[must_use]
    pub fn with_parent(mut self, index: usize) -> Self {
        self.parent_index = Some(index);
        self
    }

    /// Returns true if this row is nested under another holding.
    #[must_use]
    pub fn is_sub_holding(&self) -> bool {
        self.parent_index.is_some()
    }
}
