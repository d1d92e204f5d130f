//! Clustering trait.

use crate::error::Result;
use ndarray::ArrayView2;

/// Clusters as groups of row indices into the clustered data, in cut order.
pub type ClusterSet = Vec<Vec<usize>>;

/// Trait for threshold-cut clustering algorithms.
///
/// The cascade controller only depends on this capability, so the linkage
/// backend can be swapped without touching the round loop.
pub trait Clusterer {
    /// Group the rows of `data` so that no two members of the same group are
    /// separated by more than `threshold`.
    fn cluster(&self, data: ArrayView2<'_, f64>, threshold: f64) -> Result<ClusterSet>;
}
