//! Run configuration passed in by the orchestration layer.
//!
//! A clustering run is fully described by the embedding method, the map
//! geometry, and the training hyperparameters. Values can be built in code
//! or loaded from TOML:
//!
//! ```toml
//! embedding_method = "cooccurrence"
//! grid_width = 8
//! grid_height = 8
//! iterations = 2000
//! random_seed = 7
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::EmbeddingMethod;

/// Decides whether a batch of a given size runs on the rayon pool.
pub trait ParallelPolicy {
    /// Returns true if parallel processing should be used for the given count.
    fn should_parallelize(&self, count: usize) -> bool;
}

/// Order in which training samples are presented to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOrder {
    /// Sample `t mod n` at iteration `t`.
    #[default]
    Cyclic,

    /// Sample drawn from the seeded random source.
    Random,
}

/// Schedule used to shrink learning rate and neighborhood spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecaySchedule {
    /// `x0 * (1 - t / T)`; reaches zero at the end of training.
    #[default]
    Linear,

    /// `x0 / (1 + t / (T / 2))`; halves by the last iteration.
    Asymptotic,
}

impl DecaySchedule {
    /// Decayed value of `initial` at iteration `t` of `total`.
    #[must_use]
    pub fn apply(&self, initial: f64, t: usize, total: usize) -> f64 {
        if total == 0 {
            return initial;
        }
        let progress = t as f64 / total as f64;
        match self {
            Self::Linear => initial * (1.0 - progress),
            Self::Asymptotic => initial / (1.0 + 2.0 * progress),
        }
    }
}

fn default_grid_side() -> usize {
    6
}

fn default_sigma() -> f64 {
    1.0
}

fn default_learning_rate() -> f64 {
    0.5
}

fn default_iterations() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

fn default_min_holders() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> usize {
    100
}

/// Configuration for one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Product method the portfolio vectors were built from.
    #[serde(default)]
    pub embedding_method: EmbeddingMethod,

    /// Map width (x axis).
    #[serde(default = "default_grid_side")]
    pub grid_width: usize,

    /// Map height (y axis).
    #[serde(default = "default_grid_side")]
    pub grid_height: usize,

    /// Initial Gaussian neighborhood spread.
    #[serde(default = "default_sigma")]
    pub initial_sigma: f64,

    /// Initial learning rate.
    #[serde(default = "default_learning_rate")]
    pub initial_learning_rate: f64,

    /// Number of single-sample training iterations.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Seed for weight initialization and random sample order.
    #[serde(default = "default_seed")]
    pub random_seed: u64,

    /// Sample presentation order.
    #[serde(default)]
    pub sample_order: SampleOrder,

    /// Learning-rate and sigma schedule.
    #[serde(default)]
    pub decay: DecaySchedule,

    /// Minimum number of holders with portfolio vectors required to train.
    #[serde(default = "default_min_holders")]
    pub min_holders: usize,

    /// Enable parallel processing (requires the `parallel` feature).
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Minimum batch size to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    #[serde(default = "default_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            embedding_method: EmbeddingMethod::default(),
            grid_width: default_grid_side(),
            grid_height: default_grid_side(),
            initial_sigma: default_sigma(),
            initial_learning_rate: default_learning_rate(),
            iterations: default_iterations(),
            random_seed: default_seed(),
            sample_order: SampleOrder::default(),
            decay: DecaySchedule::default(),
            min_holders: default_min_holders(),
            parallel: true,
            parallel_threshold: default_threshold(),
        }
    }
}

impl ClusteringConfig {
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

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CoreError::config_parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &str) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Sets the embedding method.
    #[must_use]
    pub fn with_method(mut self, method: EmbeddingMethod) -> Self {
        self.embedding_method = method;
        self
    }

    /// Sets the grid size.
    #[must_use]
    pub fn with_grid(mut self, width: usize, height: usize) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Sets the initial neighborhood spread.
    #[must_use]
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.initial_sigma = sigma;
        self
    }

    /// Sets the initial learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.initial_learning_rate = rate;
        self
    }

    /// Sets the iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Sets the sample order.
    #[must_use]
    pub fn with_sample_order(mut self, order: SampleOrder) -> Self {
        self.sample_order = order;
        self
    }

    /// Sets the decay schedule.
    #[must_use]
    pub fn with_decay(mut self, decay: DecaySchedule) -> Self {
        self.decay = decay;
        self
    }

    /// Sets the minimum holder count.
    #[must_use]
    pub fn with_min_holders(mut self, min: usize) -> Self {
        self.min_holders = min;
        self
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

    /// Number of neurons on the map.
    #[must_use]
    pub fn neuron_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Checks ranges.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(CoreError::invalid_config(
                "grid",
                format!("{}x{} has no neurons", self.grid_width, self.grid_height),
            ));
        }
        if !(self.initial_sigma.is_finite() && self.initial_sigma > 0.0) {
            return Err(CoreError::invalid_config("initial_sigma", "must be positive"));
        }
        if !(self.initial_learning_rate.is_finite() && self.initial_learning_rate > 0.0) {
            return Err(CoreError::invalid_config(
                "initial_learning_rate",
                "must be positive",
            ));
        }
        if self.iterations == 0 {
            return Err(CoreError::invalid_config("iterations", "must be at least 1"));
        }
        Ok(())
    }
}

impl ParallelPolicy for ClusteringConfig {
    fn should_parallelize(&self, count: usize) -> bool {
        ClusteringConfig::should_parallelize(self, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default() {
        let config = ClusteringConfig::default();
        assert_eq!(config.embedding_method, EmbeddingMethod::Hybrid);
        assert_eq!(config.neuron_count(), 36);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.sample_order, SampleOrder::Cyclic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClusteringConfig::new()
            .with_method(EmbeddingMethod::Cooccurrence)
            .with_grid(2, 3)
            .with_sigma(0.8)
            .with_learning_rate(0.3)
            .with_iterations(50)
            .with_seed(9)
            .with_sample_order(SampleOrder::Random)
            .with_decay(DecaySchedule::Asymptotic)
            .with_min_holders(1);

        assert_eq!(config.grid_width, 2);
        assert_eq!(config.grid_height, 3);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.decay, DecaySchedule::Asymptotic);
        assert_eq!(config.min_holders, 1);
    }

    #[test]
    fn test_validation() {
        assert!(ClusteringConfig::new().with_grid(0, 4).validate().is_err());
        assert!(ClusteringConfig::new().with_sigma(0.0).validate().is_err());
        assert!(ClusteringConfig::new().with_learning_rate(f64::NAN).validate().is_err());
        assert!(ClusteringConfig::new().with_iterations(0).validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ClusteringConfig::from_toml_str(
            r#"
            embedding_method = "glove"
            grid_width = 8
            grid_height = 4
            sample_order = "random"
            "#,
        )
        .unwrap();

        assert_eq!(config.embedding_method, EmbeddingMethod::Cooccurrence);
        assert_eq!(config.neuron_count(), 32);
        assert_eq!(config.sample_order, SampleOrder::Random);
        assert_eq!(config.iterations, 1000);
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(ClusteringConfig::from_toml_str("grid_width = 0").is_err());
        assert!(ClusteringConfig::from_toml_str("grid_width = [").is_err());
    }

    #[test]
    fn test_decay_schedules() {
        assert_relative_eq!(DecaySchedule::Linear.apply(0.5, 0, 100), 0.5);
        assert_relative_eq!(DecaySchedule::Linear.apply(0.5, 50, 100), 0.25);
        assert_relative_eq!(DecaySchedule::Asymptotic.apply(1.0, 50, 100), 0.5);
        assert!(DecaySchedule::Linear.apply(1.0, 99, 100) > 0.0);
    }

    #[test]
    fn test_should_parallelize() {
        let config = ClusteringConfig::new().with_threshold(10);

        #[cfg(feature = "parallel")]
        assert!(config.should_parallelize(10));

        #[cfg(not(feature = "parallel"))]
        assert!(!config.should_parallelize(10));

        assert!(!ClusteringConfig::sequential().should_parallelize(1_000));
    }

    #[test]
    fn test_serde() {
        let config = ClusteringConfig::new().with_grid(3, 5).with_seed(11);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClusteringConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
