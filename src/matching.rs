//! Nearest-representative matching.
//!
//! Every point is compared against the current round's representatives.
//! The nearest one wins, but only if it is strictly within the threshold;
//! otherwise the point is flagged unmatched and rolls into the next round.

use crate::distance::cross_euclidean;
use ndarray::ArrayView2;

/// Sentinel label for a point that matched no representative.
pub const UNMATCHED: i64 = -1;

/// Outcome of matching one batch of points against one representative batch.
#[derive(Debug, Clone)]
pub struct RoundMatch {
    /// Per-point local representative id, or [`UNMATCHED`].
    pub labels: Vec<i64>,
    /// Positions (into the matched batch) of the unmatched points.
    pub unmatched: Vec<usize>,
}

impl RoundMatch {
    /// Number of points that matched a representative.
    pub fn matched_count(&self) -> usize {
        self.labels.len() - self.unmatched.len()
    }
}

/// Assign each point to its nearest representative if strictly within
/// `threshold`, else mark it unmatched.
pub fn match_to_representatives(
    points: ArrayView2<'_, f64>,
    representatives: ArrayView2<'_, f64>,
    threshold: f64,
) -> RoundMatch {
    let n = points.nrows();
    if representatives.nrows() == 0 {
        return RoundMatch {
            labels: vec![UNMATCHED; n],
            unmatched: (0..n).collect(),
        };
    }

    let distances = cross_euclidean(points, representatives);
    let mut labels = Vec::with_capacity(n);
    let mut unmatched = Vec::new();
    for i in 0..n {
        let mut nearest = 0usize;
        let mut nearest_distance = f64::INFINITY;
        for (j, &d) in distances.row(i).iter().enumerate() {
            if d < nearest_distance {
                nearest = j;
                nearest_distance = d;
            }
        }
        if nearest_distance < threshold {
            labels.push(nearest as i64);
        } else {
            labels.push(UNMATCHED);
            unmatched.push(i);
        }
    }
    RoundMatch { labels, unmatched }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_point_identical_to_representative_matches_it() {
        let reps = array![[0.0, 0.0], [5.0, 5.0]];
        let points = array![[5.0, 5.0]];

        let result = match_to_representatives(points.view(), reps.view(), 1e-9);
        assert_eq!(result.labels, vec![1]);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_acceptance_is_strict() {
        let reps = array![[0.0]];
        let points = array![[0.3]];

        // distance == threshold is a miss
        let result = match_to_representatives(points.view(), reps.view(), 0.3);
        assert_eq!(result.labels, vec![UNMATCHED]);
        assert_eq!(result.unmatched, vec![0]);

        let result = match_to_representatives(points.view(), reps.view(), 0.31);
        assert_eq!(result.labels, vec![0]);
    }

    #[test]
    fn test_nearest_representative_wins() {
        let reps = array![[0.0], [1.0], [2.0]];
        let points = array![[0.9], [1.9], [0.1]];

        let result = match_to_representatives(points.view(), reps.view(), 0.5);
        assert_eq!(result.labels, vec![1, 2, 0]);
        assert_eq!(result.matched_count(), 3);
    }

    #[test]
    fn test_mixed_batch_reports_unmatched_positions() {
        let reps = array![[0.0, 0.0]];
        let points = array![[0.1, 0.0], [9.0, 9.0], [0.0, 0.1], [7.0, 7.0]];

        let result = match_to_representatives(points.view(), reps.view(), 0.5);
        assert_eq!(result.labels, vec![0, UNMATCHED, 0, UNMATCHED]);
        assert_eq!(result.unmatched, vec![1, 3]);
        assert_eq!(result.matched_count(), 2);
    }

    #[test]
    fn test_no_representatives_leaves_all_unmatched() {
        let reps = ndarray::Array2::<f64>::zeros((0, 2));
        let points = array![[0.0, 0.0], [1.0, 1.0]];

        let result = match_to_representatives(points.view(), reps.view(), 10.0);
        assert_eq!(result.labels, vec![UNMATCHED, UNMATCHED]);
        assert_eq!(result.unmatched, vec![0, 1]);
    }
}
