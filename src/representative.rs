//! Representative extraction.
//!
//! Each cluster is collapsed to its centroid, the arithmetic mean of its
//! member rows. Cluster order is preserved so centroid `k` speaks for
//! cluster `k` of the cut.

use crate::cluster::ClusterSet;
use ndarray::{Array2, ArrayView2};

/// One centroid row per cluster, in cluster order.
pub fn centroids(data: ArrayView2<'_, f64>, clusters: &ClusterSet) -> Array2<f64> {
    let mut representatives = Array2::zeros((clusters.len(), data.ncols()));
    for (k, members) in clusters.iter().enumerate() {
        if members.is_empty() {
            continue;
        }
        let mut centroid = representatives.row_mut(k);
        for &row in members {
            centroid += &data.row(row);
        }
        centroid /= members.len() as f64;
    }
    representatives
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_centroid_is_member_mean() {
        let data = array![[0.0, 0.0], [2.0, 4.0], [10.0, 10.0]];
        let clusters = vec![vec![0, 1], vec![2]];

        let reps = centroids(data.view(), &clusters);
        assert_eq!(reps.dim(), (2, 2));
        assert_eq!(reps.row(0), array![1.0, 2.0]);
        assert_eq!(reps.row(1), array![10.0, 10.0]);
    }

    #[test]
    fn test_cluster_order_preserved() {
        let data = array![[5.0], [1.0], [3.0]];
        let clusters = vec![vec![2], vec![0], vec![1]];

        let reps = centroids(data.view(), &clusters);
        assert_eq!(reps.row(0)[0], 3.0);
        assert_eq!(reps.row(1)[0], 5.0);
        assert_eq!(reps.row(2)[0], 1.0);
    }

    #[test]
    fn test_no_clusters_yields_empty_matrix() {
        let data = array![[1.0, 2.0]];
        let reps = centroids(data.view(), &Vec::new());
        assert_eq!(reps.dim(), (0, 2));
    }
}
