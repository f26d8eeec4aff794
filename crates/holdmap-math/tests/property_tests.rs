//! Property-based tests for holdmap-math.

use approx::assert_relative_eq;
use holdmap_math::distance::{euclidean, l2_norm, normalize_in_place};
use holdmap_math::scaling::rows_to_matrix;
use holdmap_math::Standardizer;
use ndarray::Axis;
use proptest::prelude::*;

fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..12, 1usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(-1.0e4..1.0e4f64, cols), rows)
    })
}

proptest! {
    #[test]
    fn standardized_columns_have_zero_mean(rows in matrix_strategy()) {
        let data = rows_to_matrix(&rows).unwrap();
        let (_, z) = Standardizer::fit_transform(&data).unwrap();
        for column in z.axis_iter(Axis(1)) {
            let mean = column.sum() / column.len() as f64;
            prop_assert!(mean.abs() < 1e-8);
        }
    }

    #[test]
    fn standardized_values_are_finite(rows in matrix_strategy()) {
        let data = rows_to_matrix(&rows).unwrap();
        let (_, z) = Standardizer::fit_transform(&data).unwrap();
        prop_assert!(z.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn distance_is_symmetric(
        a in prop::collection::vec(-100.0..100.0f64, 4),
        b in prop::collection::vec(-100.0..100.0f64, 4),
    ) {
        assert_relative_eq!(euclidean(&a, &b), euclidean(&b, &a));
        prop_assert!(euclidean(&a, &b) >= 0.0);
    }

    #[test]
    fn normalized_vectors_have_unit_norm(mut v in prop::collection::vec(-100.0..100.0f64, 1..8)) {
        prop_assume!(l2_norm(&v) > 1e-6);
        normalize_in_place(&mut v);
        prop_assert!((l2_norm(&v) - 1.0).abs() < 1e-9);
    }
}
