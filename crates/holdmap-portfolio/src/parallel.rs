//! Parallel processing utilities.
//!
//! Provides conditional parallel iteration based on configuration
//! and collection size. Uses rayon when the `parallel` feature is enabled.

use holdmap_core::ParallelPolicy;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - The policy allows parallelism
/// - The collection size reaches the policy threshold
///
/// Output order always matches input order.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F, P>(items: &[T], policy: &P, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
    P: ParallelPolicy + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if policy.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
