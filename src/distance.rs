//! Pairwise Euclidean distances.
//!
//! Two shapes are needed by the cascade: the condensed upper-triangular
//! distance list consumed by the linkage step, and the dense points-by-
//! representatives matrix consumed by the matcher.
//!
//! The condensed output carries a length contract: `n * (n - 1) / 2` entries
//! for `n` rows. A malformed result is treated as a transient numerical
//! fault and recomputed once; a second malformed result is fatal
//! ([`Error::DistanceFault`]).

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::warn;

/// Euclidean distance between two rows, clamped at zero.
#[inline]
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let d = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let dx = x - y;
            dx * dx
        })
        .sum::<f64>()
        .sqrt();
    // rounding may surface -0.0; the contract is non-negative
    d.max(0.0)
}

/// Condensed (upper-triangular, row-major) Euclidean distances over all
/// unordered row pairs.
pub fn condensed_euclidean(data: ArrayView2<'_, f64>) -> Vec<f64> {
    let n = data.nrows();
    let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for row in 0..n.saturating_sub(1) {
        for col in (row + 1)..n {
            condensed.push(euclidean(data.row(row), data.row(col)));
        }
    }
    condensed
}

/// Condensed distances with the length contract enforced.
pub fn condensed_checked(data: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
    condensed_with_retry(data.nrows(), || condensed_euclidean(data))
}

fn condensed_with_retry<F>(n: usize, compute: F) -> Result<Vec<f64>>
where
    F: Fn() -> Vec<f64>,
{
    let expected = n * n.saturating_sub(1) / 2;
    let first = compute();
    if first.len() == expected {
        return Ok(first);
    }
    warn!(
        expected,
        found = first.len(),
        "malformed condensed distance output, recomputing"
    );
    let second = compute();
    if second.len() == expected {
        return Ok(second);
    }
    Err(Error::DistanceFault {
        expected,
        found: second.len(),
    })
}

/// Dense Euclidean distance matrix between `points` (rows) and
/// `representatives` (columns).
pub fn cross_euclidean(
    points: ArrayView2<'_, f64>,
    representatives: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let n = points.nrows();
    let r = representatives.nrows();
    let mut distances = Array2::zeros((n, r));
    for i in 0..n {
        for j in 0..r {
            distances[[i, j]] = euclidean(points.row(i), representatives.row(j));
        }
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;
    use std::cell::Cell;

    #[test]
    fn test_condensed_length_and_order() {
        let data = array![[0.0, 0.0], [3.0, 4.0], [6.0, 8.0]];
        let condensed = condensed_euclidean(data.view());
        assert_eq!(condensed.len(), 3);
        assert!((condensed[0] - 5.0).abs() < 1e-12); // (0,1)
        assert!((condensed[1] - 10.0).abs() < 1e-12); // (0,2)
        assert!((condensed[2] - 5.0).abs() < 1e-12); // (1,2)
    }

    #[test]
    fn test_condensed_single_row_is_empty() {
        let data = array![[1.0, 2.0]];
        assert!(condensed_euclidean(data.view()).is_empty());
    }

    #[test]
    fn test_cross_distances_to_identical_representative() {
        let points = array![[1.0, 1.0], [4.0, 5.0]];
        let reps = array![[1.0, 1.0]];
        let distances = cross_euclidean(points.view(), reps.view());
        assert_eq!(distances.dim(), (2, 1));
        assert!(distances[[0, 0]].abs() < 1e-12);
        assert!((distances[[1, 0]] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_matrix_agrees_with_condensed() {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(42);
        let data = Array2::from_shape_fn((12, 4), |_| rng.random::<f64>());

        let condensed = condensed_checked(data.view()).unwrap();
        let cross = cross_euclidean(data.view(), data.view());

        let mut k = 0;
        for i in 0..12 {
            assert!(cross[[i, i]].abs() < 1e-12);
            for j in (i + 1)..12 {
                assert!((cross[[i, j]] - condensed[k]).abs() < 1e-12);
                k += 1;
            }
        }
    }

    #[test]
    fn test_retry_recovers_from_single_fault() {
        let calls = Cell::new(0usize);
        let result = condensed_with_retry(3, || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                vec![1.0] // wrong length on the first attempt
            } else {
                vec![1.0, 2.0, 3.0]
            }
        });
        assert_eq!(result.unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_retry_fails_after_second_fault() {
        let result = condensed_with_retry(3, || vec![1.0]);
        assert_eq!(
            result.unwrap_err(),
            Error::DistanceFault {
                expected: 3,
                found: 1
            }
        );
    }

    proptest! {
        #[test]
        fn prop_condensed_length_and_non_negative(
            rows in proptest::collection::vec(
                proptest::collection::vec(-100.0f64..100.0, 3),
                1..20,
            )
        ) {
            let n = rows.len();
            let flat: Vec<f64> = rows.into_iter().flatten().collect();
            let data = Array2::from_shape_vec((n, 3), flat).unwrap();
            let condensed = condensed_euclidean(data.view());
            prop_assert_eq!(condensed.len(), n * (n - 1) / 2);
            prop_assert!(condensed.iter().all(|&d| d >= 0.0));
        }
    }
}
