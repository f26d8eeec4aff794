//! Self-organizing map.
//!
//! A [`SomGrid`] holds one weight vector per neuron on a `width x height`
//! rectangle. Training moves the best matching unit (BMU) and its grid
//! neighbors toward each presented sample, with a Gaussian neighborhood whose
//! spread and learning rate shrink over time.
//!
//! Given the same seed, sample order and iteration count, training produces
//! the same weights. The grid is caller-owned and serializable; nothing here
//! keeps process-wide state.

use holdmap_core::{ClusteringConfig, DecaySchedule, ParallelPolicy, SampleOrder};
use holdmap_math::distance::normalize_in_place;
use holdmap_portfolio::parallel::maybe_parallel_map;
use ndarray::{Array2, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SomError, SomResult};
use crate::topology::{grid_distance_sq, neighbors, DistanceMap};

/// Stream of the seeded generator used for random sample order.
const ORDER_STREAM: u64 = 1;

/// Training hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SomParams {
    /// Initial neighborhood spread.
    pub initial_sigma: f64,
    /// Initial learning rate.
    pub initial_learning_rate: f64,
    /// Seed for weights and random sample order.
    pub random_seed: u64,
    /// Sample presentation order.
    pub sample_order: SampleOrder,
    /// Decay schedule for sigma and learning rate.
    pub decay: DecaySchedule,
}

impl Default for SomParams {
    fn default() -> Self {
        Self::from_config(&ClusteringConfig::default())
    }
}

impl SomParams {
    /// Takes the training parameters from a run configuration.
    #[must_use]
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            initial_sigma: config.initial_sigma,
            initial_learning_rate: config.initial_learning_rate,
            random_seed: config.random_seed,
            sample_order: config.sample_order,
            decay: config.decay,
        }
    }

    fn validate(&self) -> SomResult<()> {
        if !(self.initial_sigma.is_finite() && self.initial_sigma > 0.0) {
            return Err(SomError::invalid_config("initial_sigma must be positive"));
        }
        if !(self.initial_learning_rate.is_finite() && self.initial_learning_rate > 0.0) {
            return Err(SomError::invalid_config("initial_learning_rate must be positive"));
        }
        Ok(())
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Iterations performed.
    pub iterations: usize,
    /// Learning rate at the last iteration.
    pub final_learning_rate: f64,
    /// Neighborhood spread at the last iteration.
    pub final_sigma: f64,
    /// Mean sample-to-BMU distance after training.
    pub quantization_error: f64,
}

/// A rectangular self-organizing map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomGrid {
    width: usize,
    height: usize,
    /// One row per neuron, x-major: row `x * height + y`.
    weights: Array2<f64>,
    params: SomParams,
    trained: bool,
}

fn squared_distance(weight: ArrayView1<'_, f64>, sample: &[f64]) -> f64 {
    weight.iter().zip(sample).map(|(w, x)| (w - x).powi(2)).sum()
}

fn check_finite(index: usize, sample: &[f64]) -> SomResult<()> {
    if sample.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(SomError::invalid_sample(index, "contains NaN or infinite values"))
    }
}

impl SomGrid {
    /// Creates a map with seeded random unit-length weights.
    pub fn new(width: usize, height: usize, dimension: usize, params: SomParams) -> SomResult<Self> {
        if width == 0 || height == 0 {
            return Err(SomError::invalid_config(format!("{width}x{height} grid has no neurons")));
        }
        if dimension == 0 {
            return Err(SomError::invalid_config("dimension must be at least 1"));
        }
        params.validate()?;

        let mut rng = ChaCha20Rng::seed_from_u64(params.random_seed);
        let neurons = width * height;
        let mut flat = Vec::with_capacity(neurons * dimension);
        for _ in 0..neurons {
            let mut w: Vec<f64> = (0..dimension).map(|_| rng.gen_range(-1.0..1.0)).collect();
            normalize_in_place(&mut w);
            flat.extend(w);
        }
        let weights = Array2::from_shape_vec((neurons, dimension), flat)
            .map_err(|e| SomError::invalid_config(e.to_string()))?;

        Ok(Self {
            width,
            height,
            weights,
            params,
            trained: false,
        })
    }

    /// Grid width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Weight vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.weights.ncols()
    }

    /// Training parameters.
    #[must_use]
    pub fn params(&self) -> &SomParams {
        &self.params
    }

    /// Returns true once [`SomGrid::train`] has completed.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Weight vector of the neuron at `(x, y)`.
    #[must_use]
    pub fn weight(&self, x: usize, y: usize) -> Option<ArrayView1<'_, f64>> {
        (x < self.width && y < self.height).then(|| self.weights.row(x * self.height + y))
    }

    fn position(&self, index: usize) -> (usize, usize) {
        (index / self.height, index % self.height)
    }

    /// BMU index and squared distance. Ties go to the first neuron in
    /// x-major order.
    fn best_match(&self, sample: &[f64]) -> (usize, f64) {
        let mut best = (0, f64::INFINITY);
        for (index, weight) in self.weights.outer_iter().enumerate() {
            let d = squared_distance(weight, sample);
            if d < best.1 {
                best = (index, d);
            }
        }
        best
    }

    fn check_samples(&self, samples: &Array2<f64>) -> SomResult<Vec<Vec<f64>>> {
        if samples.ncols() != self.dimension() {
            return Err(SomError::dimension_mismatch(self.dimension(), samples.ncols()));
        }
        samples
            .outer_iter()
            .enumerate()
            .map(|(i, row)| {
                let row = row.to_vec();
                check_finite(i, &row)?;
                Ok(row)
            })
            .collect()
    }

    /// Trains the map on `samples` (one row per sample) for `iterations`
    /// single-sample updates.
    ///
    /// A map is trained once; afterwards its weights are frozen and a second
    /// call returns [`SomError::AlreadyTrained`].
    pub fn train(&mut self, samples: &Array2<f64>, iterations: usize) -> SomResult<TrainingReport> {
        if self.trained {
            return Err(SomError::AlreadyTrained);
        }
        if iterations == 0 {
            return Err(SomError::invalid_config("iterations must be positive"));
        }
        if samples.nrows() == 0 {
            return Err(SomError::EmptySamples);
        }
        let rows = self.check_samples(samples)?;
        let n = rows.len();

        info!(
            width = self.width,
            height = self.height,
            samples = n,
            iterations,
            "training self-organizing map"
        );

        let mut rng = ChaCha20Rng::seed_from_u64(self.params.random_seed);
        rng.set_stream(ORDER_STREAM);

        let SomParams {
            initial_sigma,
            initial_learning_rate,
            sample_order,
            decay,
            ..
        } = self.params;
        let mut learning_rate = initial_learning_rate;
        let mut sigma = initial_sigma;

        for t in 0..iterations {
            let sample = match sample_order {
                SampleOrder::Cyclic => &rows[t % n],
                SampleOrder::Random => &rows[rng.gen_range(0..n)],
            };
            let (bmu, _) = self.best_match(sample);
            let bmu_pos = self.position(bmu);

            learning_rate = decay.apply(initial_learning_rate, t, iterations);
            sigma = decay.apply(initial_sigma, t, iterations);
            let spread = 2.0 * sigma * sigma;

            let height = self.height;
            for (index, mut weight) in self.weights.outer_iter_mut().enumerate() {
                let d2 = grid_distance_sq((index / height, index % height), bmu_pos);
                let h = (-d2 / spread).exp();
                let step = learning_rate * h;
                if step == 0.0 {
                    continue;
                }
                for (w, x) in weight.iter_mut().zip(sample) {
                    *w += step * (x - *w);
                }
            }
        }

        self.trained = true;
        let quantization_error = self.mean_bmu_distance(&rows);
        info!(quantization_error, "training finished");

        Ok(TrainingReport {
            iterations,
            final_learning_rate: learning_rate,
            final_sigma: sigma,
            quantization_error,
        })
    }

    fn mean_bmu_distance(&self, rows: &[Vec<f64>]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        let total: f64 = rows.iter().map(|r| self.best_match(r).1.sqrt()).sum();
        total / rows.len() as f64
    }

    /// Grid position of the BMU for `sample` and the distance to it.
    pub fn winner_with_distance(&self, sample: &[f64]) -> SomResult<((usize, usize), f64)> {
        if !self.trained {
            return Err(SomError::Untrained);
        }
        if sample.len() != self.dimension() {
            return Err(SomError::dimension_mismatch(self.dimension(), sample.len()));
        }
        check_finite(0, sample)?;
        let (index, d2) = self.best_match(sample);
        Ok((self.position(index), d2.sqrt()))
    }

    /// Grid position `(x, y)` of the BMU for `sample`.
    ///
    /// ```rust
    /// use holdmap_som::grid::{SomGrid, SomParams};
    /// use ndarray::array;
    ///
    /// let mut grid = SomGrid::new(2, 2, 2, SomParams::default()).unwrap();
    /// grid.train(&array![[1.0, 0.0], [0.0, 1.0]], 200).unwrap();
    /// let (x, y) = grid.winner(&[1.0, 0.0]).unwrap();
    /// assert!(x < 2 && y < 2);
    /// ```
    pub fn winner(&self, sample: &[f64]) -> SomResult<(usize, usize)> {
        self.winner_with_distance(sample).map(|(pos, _)| pos)
    }

    /// BMU positions and distances for every row of `samples`.
    ///
    /// Runs in parallel when `policy` allows it for the batch size.
    pub fn winners<P>(&self, samples: &Array2<f64>, policy: &P) -> SomResult<Vec<((usize, usize), f64)>>
    where
        P: ParallelPolicy + Sync + ?Sized,
    {
        if !self.trained {
            return Err(SomError::Untrained);
        }
        let rows = self.check_samples(samples)?;
        let found = maybe_parallel_map(&rows, policy, |row| {
            let (index, d2) = self.best_match(row);
            (self.position(index), d2.sqrt())
        });
        debug!(samples = found.len(), "resolved best matching units");
        Ok(found)
    }

    /// Mean distance from each sample to its BMU.
    pub fn quantization_error(&self, samples: &Array2<f64>) -> SomResult<f64> {
        if samples.nrows() == 0 {
            return Err(SomError::EmptySamples);
        }
        let rows = self.check_samples(samples)?;
        Ok(self.mean_bmu_distance(&rows))
    }

    /// U-matrix: for each neuron, the mean distance to its 8-connected
    /// neighbors' weights. A 1x1 map yields zero.
    pub fn distance_map(&self) -> SomResult<DistanceMap> {
        if !self.trained {
            return Err(SomError::Untrained);
        }
        let mut values = Array2::zeros((self.width, self.height));
        for x in 0..self.width {
            for y in 0..self.height {
                let here = self.weights.row(x * self.height + y);
                let mut total = 0.0;
                let mut count = 0usize;
                for (nx, ny) in neighbors(x, y, self.width, self.height) {
                    let there = self.weights.row(nx * self.height + ny);
                    total += here
                        .iter()
                        .zip(there.iter())
                        .map(|(a, b)| (a - b).powi(2))
                        .sum::<f64>()
                        .sqrt();
                    count += 1;
                }
                if count > 0 {
                    values[[x, y]] = total / count as f64;
                }
            }
        }
        Ok(DistanceMap::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use holdmap_math::distance::l2_norm;
    use ndarray::array;

    fn params() -> SomParams {
        SomParams::default()
    }

    fn two_blobs() -> Array2<f64> {
        array![
            [1.0, 1.0, 0.0],
            [1.1, 0.9, 0.1],
            [0.9, 1.0, -0.1],
            [-1.0, -1.0, 0.0],
            [-1.1, -0.9, 0.1],
            [-0.9, -1.0, -0.1],
        ]
    }

    #[test]
    fn test_initial_weights_are_unit_length() {
        let grid = SomGrid::new(3, 2, 4, params()).unwrap();
        for x in 0..3 {
            for y in 0..2 {
                let w = grid.weight(x, y).unwrap().to_vec();
                assert_relative_eq!(l2_norm(&w), 1.0, epsilon = 1e-12);
            }
        }
        assert!(grid.weight(3, 0).is_none());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(SomGrid::new(0, 2, 3, params()), Err(SomError::InvalidConfig { .. })));
        assert!(SomGrid::new(2, 2, 0, params()).is_err());
        let bad = SomParams {
            initial_sigma: 0.0,
            ..params()
        };
        assert!(SomGrid::new(2, 2, 3, bad).is_err());
    }

    #[test]
    fn test_queries_require_training() {
        let grid = SomGrid::new(2, 2, 3, params()).unwrap();
        assert!(matches!(grid.winner(&[0.0, 0.0, 0.0]), Err(SomError::Untrained)));
        assert!(matches!(grid.distance_map(), Err(SomError::Untrained)));
    }

    #[test]
    fn test_train_rejects_bad_input() {
        let mut grid = SomGrid::new(2, 2, 3, params()).unwrap();
        assert!(matches!(grid.train(&Array2::zeros((0, 3)), 10), Err(SomError::EmptySamples)));
        assert!(matches!(
            grid.train(&Array2::zeros((2, 2)), 10),
            Err(SomError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        let nan = array![[0.0, 1.0, 2.0], [f64::NAN, 0.0, 0.0]];
        assert!(matches!(grid.train(&nan, 10), Err(SomError::InvalidSample { index: 1, .. })));
        assert!(!grid.is_trained());
    }

    #[test]
    fn test_trained_grid_is_frozen() {
        let mut grid = SomGrid::new(2, 2, 2, params()).unwrap();
        grid.train(&array![[1.0, 0.0], [0.0, 1.0]], 50).unwrap();
        let before = grid.clone();

        let err = grid.train(&array![[-5.0, -5.0]], 50).unwrap_err();
        assert!(matches!(err, SomError::AlreadyTrained));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_zero_iterations_leave_grid_untrained() {
        let mut grid = SomGrid::new(2, 2, 2, params()).unwrap();
        let err = grid.train(&array![[1.0, 0.0]], 0).unwrap_err();
        assert!(matches!(err, SomError::InvalidConfig { .. }));
        assert!(!grid.is_trained());
        assert!(matches!(grid.winner(&[1.0, 0.0]), Err(SomError::Untrained)));
    }

    #[test]
    fn test_separates_blobs() {
        let mut grid = SomGrid::new(3, 3, 3, params()).unwrap();
        let data = two_blobs();
        let report = grid.train(&data, 600).unwrap();
        assert_eq!(report.iterations, 600);
        assert!(report.final_learning_rate < 0.01);

        let a = grid.winner(&[1.0, 1.0, 0.0]).unwrap();
        let b = grid.winner(&[-1.0, -1.0, 0.0]).unwrap();
        assert_ne!(a, b);
        assert!(report.quantization_error < 0.5);
    }

    #[test]
    fn test_training_is_deterministic() {
        let data = two_blobs();
        let mut first = SomGrid::new(3, 3, 3, params()).unwrap();
        let mut second = SomGrid::new(3, 3, 3, params()).unwrap();
        first.train(&data, 300).unwrap();
        second.train(&data, 300).unwrap();
        assert_eq!(first, second);

        let random = SomParams {
            sample_order: SampleOrder::Random,
            ..params()
        };
        let mut third = SomGrid::new(3, 3, 3, random).unwrap();
        let mut fourth = SomGrid::new(3, 3, 3, random).unwrap();
        third.train(&data, 300).unwrap();
        fourth.train(&data, 300).unwrap();
        assert_eq!(third, fourth);
    }

    #[test]
    fn test_winner_is_idempotent() {
        let mut grid = SomGrid::new(2, 3, 3, params()).unwrap();
        grid.train(&two_blobs(), 200).unwrap();
        let sample = [0.3, -0.2, 0.5];
        let first = grid.winner(&sample).unwrap();
        for _ in 0..5 {
            assert_eq!(grid.winner(&sample).unwrap(), first);
        }
        assert!(matches!(grid.winner(&[0.0]), Err(SomError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_winners_match_single_queries() {
        let mut grid = SomGrid::new(3, 3, 3, params()).unwrap();
        let data = two_blobs();
        grid.train(&data, 300).unwrap();
        let config = ClusteringConfig::sequential();
        let batch = grid.winners(&data, &config).unwrap();
        for (row, (pos, dist)) in data.outer_iter().zip(&batch) {
            let (single, d) = grid.winner_with_distance(&row.to_vec()).unwrap();
            assert_eq!(*pos, single);
            assert_relative_eq!(*dist, d);
        }
    }

    #[test]
    fn test_distance_map_shape() {
        let mut grid = SomGrid::new(4, 2, 3, params()).unwrap();
        grid.train(&two_blobs(), 300).unwrap();
        let map = grid.distance_map().unwrap();
        assert_eq!((map.width(), map.height()), (4, 2));
        assert!(map.values().iter().all(|v| *v >= 0.0));
        assert_relative_eq!(map.normalized().max(), 1.0);

        let mut single = SomGrid::new(1, 1, 3, params()).unwrap();
        single.train(&two_blobs(), 10).unwrap();
        assert_relative_eq!(single.distance_map().unwrap().max(), 0.0);
    }

    #[test]
    fn test_asymptotic_decay_keeps_learning() {
        let config = ClusteringConfig::new().with_decay(DecaySchedule::Asymptotic);
        let mut grid = SomGrid::new(2, 2, 3, SomParams::from_config(&config)).unwrap();
        let report = grid.train(&two_blobs(), 100).unwrap();
        assert!(report.final_learning_rate > config.initial_learning_rate / 4.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut grid = SomGrid::new(2, 2, 3, params()).unwrap();
        grid.train(&two_blobs(), 50).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let restored: SomGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.winner(&[1.0, 1.0, 0.0]).unwrap(), grid.winner(&[1.0, 1.0, 0.0]).unwrap());
    }
}
