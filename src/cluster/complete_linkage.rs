//! Complete-linkage agglomerative clustering with a distance-threshold cut.
//!
//! Bottom-up clustering that repeatedly merges the two closest clusters,
//! where cluster distance is the **maximum** pairwise distance between
//! members. Complete linkage keeps clusters compact, which is what the
//! matcher needs: every member of a cut cluster sits within the threshold
//! of every other member, so the cluster centroid is a usable stand-in for
//! the whole group.
//!
//! The cut criterion mirrors `fcluster(Z, t, criterion='distance')`: merges
//! at dissimilarity ≤ `threshold` survive, everything above is severed.

use super::dendrogram::Dendrogram;
use super::traits::{ClusterSet, Clusterer};
use crate::distance::condensed_checked;
use crate::error::{Error, Result};
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};
use ndarray::ArrayView2;

/// Complete-linkage hierarchical clusterer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteLinkage;

impl CompleteLinkage {
    /// Build the full merge tree for `data`.
    pub fn dendrogram(&self, data: ArrayView2<'_, f64>) -> Result<Dendrogram> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let mut condensed = condensed_checked(data)?;

        // kodama's dendrogram uses SciPy-style cluster labels:
        // leaves are 0..n-1, merge i creates cluster id n+i.
        let dend = kodama_linkage(&mut condensed, n, KodamaMethod::Complete);

        let mut tree = Dendrogram::new(n);
        for step in dend.steps() {
            tree.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }
        Ok(tree)
    }
}

impl Clusterer for CompleteLinkage {
    fn cluster(&self, data: ArrayView2<'_, f64>, threshold: f64) -> Result<ClusterSet> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        // A lone vector is its own cluster; the linkage machinery needs pairs.
        if n == 1 {
            return Ok(vec![vec![0]]);
        }

        let labels = self.dendrogram(data)?.cut_at_distance(threshold);
        let k = labels.iter().max().map_or(0, |&max| max + 1);
        let mut clusters = vec![Vec::new(); k];
        for (row, &c) in labels.iter().enumerate() {
            clusters[c].push(row);
        }
        Ok(clusters)
    }
}
