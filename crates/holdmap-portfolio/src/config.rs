//! Configuration for portfolio aggregation.

use holdmap_core::ParallelPolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::risk::RiskScheme;

/// Configuration for portfolio aggregation and metrics.
///
/// Controls parallelism, the substitute value for unresolved holdings, and
/// the risk classification scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum holder count to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,

    /// Estimate used for an unresolved value that is not a container.
    pub default_value: Decimal,

    /// Thresholds used to label risk profiles.
    pub risk_scheme: RiskScheme,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 100,
            default_value: dec!(25000),
            risk_scheme: RiskScheme::default(),
        }
    }
}

impl AggregationConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the substitute value for unresolved holdings.
    #[must_use]
    pub fn with_default_value(mut self, value: Decimal) -> Self {
        self.default_value = value;
        self
    }

    /// Sets the risk scheme.
    #[must_use]
    pub fn with_risk_scheme(mut self, scheme: RiskScheme) -> Self {
        self.risk_scheme = scheme;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}

impl ParallelPolicy for AggregationConfig {
    fn should_parallelize(&self, count: usize) -> bool {
        AggregationConfig::should_parallelize(self, count)
    }
}
