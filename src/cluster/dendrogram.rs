//! Merge tree recorded by agglomerative clustering.
//!
//! Cluster labels follow the SciPy/MATLAB convention: leaves are `0..n-1`
//! and merge `i` creates cluster id `n + i`.

use std::collections::HashMap;

/// A dendrogram recording hierarchical cluster merges.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    /// Merge history, in nondecreasing distance order.
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy)]
pub struct Merge {
    /// First cluster being merged.
    pub cluster_a: usize,
    /// Second cluster being merged.
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create a new dendrogram for `n_items` leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Cut the tree so that no surviving merge exceeds `threshold`.
    ///
    /// Returns one label per leaf, renumbered consecutively in order of
    /// first appearance.
    pub fn cut_at_distance(&self, threshold: f64) -> Vec<usize> {
        let n = self.n_items;
        let mut parent: Vec<usize> = (0..n + self.merges.len()).collect();
        for (i, merge) in self.merges.iter().enumerate() {
            // complete linkage is monotone, so merges past the cut stay cut
            if merge.distance > threshold {
                break;
            }
            parent[merge.cluster_a] = n + i;
            parent[merge.cluster_b] = n + i;
        }

        let mut next_id = 0usize;
        let mut relabel: HashMap<usize, usize> = HashMap::new();
        let mut labels = Vec::with_capacity(n);
        for leaf in 0..n {
            let mut root = leaf;
            while parent[root] != root {
                root = parent[root];
            }
            let id = *relabel.entry(root).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            });
            labels.push(id);
        }
        labels
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_without_merges_keeps_singletons() {
        let dendro = Dendrogram::new(3);
        assert_eq!(dendro.cut_at_distance(1.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_cut_between_merge_heights() {
        // Leaves 0,1 merge low; leaves 2,3 merge low; the two pairs merge high.
        let mut dendro = Dendrogram::new(4);
        dendro.add_merge(0, 1, 0.1, 2);
        dendro.add_merge(2, 3, 0.2, 2);
        dendro.add_merge(4, 5, 5.0, 4);

        let labels = dendro.cut_at_distance(1.0);
        assert_eq!(labels, vec![0, 0, 1, 1]);

        // Cutting above the top merge collapses everything.
        let labels = dendro.cut_at_distance(10.0);
        assert_eq!(labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_cut_at_exact_merge_distance_keeps_merge() {
        let mut dendro = Dendrogram::new(2);
        dendro.add_merge(0, 1, 0.5, 2);
        assert_eq!(dendro.cut_at_distance(0.5), vec![0, 0]);
        assert_eq!(dendro.cut_at_distance(0.49), vec![0, 1]);
    }
}
