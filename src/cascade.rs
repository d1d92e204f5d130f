//! Cascading clustering controller.
//!
//! Naive agglomerative clustering is quadratic in the number of rows, which
//! rules it out for millions of event vectors. The cascade sidesteps that
//! by looping a cheap approximation until it converges:
//!
//! ```text
//! SAMPLE  every k-th unmatched row (only while the set is large)
//! CLUSTER the sample with a threshold-cut linkage
//! EXTRACT one centroid per cluster, appended to the global pattern set
//! MATCH   the *entire* unmatched set against this round's centroids
//! ```
//!
//! Rows that match a centroid receive their global label and leave the
//! working set; the mismatched remainder feeds the next round. Each round
//! therefore clusters a shrinking, increasingly unusual residue, and in
//! practice the loop drains everything long before the fixed budget of
//! [`MAX_ROUNDS`] rounds runs out (He et al., ESEC/FSE 2018).
//!
//! Global labels are allocated by offsetting each round's local ids with
//! the number of representatives produced by all earlier rounds, so a
//! label is also the row of its pattern in the final representative
//! matrix. Labels are written once: the first round that matches a row
//! wins, and later rounds never see that row again.

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use tracing::{debug, info, warn};

use crate::cluster::{Clusterer, CompleteLinkage};
use crate::config::{CascadeConfig, MAX_ROUNDS, SAMPLE_FLOOR};
use crate::error::{Error, Result};
use crate::matching::{match_to_representatives, UNMATCHED};
use crate::representative::centroids;
use crate::sample::stride_sample;
use crate::sink::{ClusterSink, IndexedRow, NullSink};
use crate::weighting::{binarize, EventWeighting};

/// Result of a cascade run.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    /// One global cluster id per input row, or [`UNMATCHED`].
    pub labels: Vec<i64>,
    /// All representatives accumulated across rounds; label `k` points at
    /// row `k`.
    pub representatives: Array2<f64>,
    /// Original row ids that never matched within the round budget.
    pub unmatched: Vec<usize>,
    /// Rounds actually executed.
    pub rounds: usize,
}

/// Cascading clustering driver.
#[derive(Debug, Clone)]
pub struct Cascade<C = CompleteLinkage> {
    config: CascadeConfig,
    clusterer: C,
}

impl Cascade<CompleteLinkage> {
    /// Create a cascade with the default complete-linkage backend.
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            config,
            clusterer: CompleteLinkage,
        }
    }
}

impl<C: Clusterer> Cascade<C> {
    /// Swap in a different clustering backend.
    pub fn with_clusterer<D: Clusterer>(self, clusterer: D) -> Cascade<D> {
        Cascade {
            config: self.config,
            clusterer,
        }
    }

    /// Run the cascade over a weighted matrix, discarding persistence.
    pub fn run(&self, weighted: ArrayView2<'_, f64>) -> Result<CascadeOutcome> {
        let raw = weighted.view();
        self.run_with_sink(weighted.view(), raw, &NullSink)
    }

    /// Run the cascade, forwarding matched groups of `raw` rows to `sink`.
    ///
    /// `raw` must be row-aligned with `weighted`; it is only read when
    /// `save_file` is enabled, so persisted clusters carry unweighted
    /// values.
    pub fn run_with_sink(
        &self,
        weighted: ArrayView2<'_, f64>,
        raw: ArrayView2<'_, f64>,
        sink: &dyn ClusterSink,
    ) -> Result<CascadeOutcome> {
        self.config.validate()?;
        let n = weighted.nrows();
        let m = weighted.ncols();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if raw.nrows() != n {
            return Err(Error::ShapeMismatch {
                expected: format!("{n} raw rows"),
                actual: format!("{} raw rows", raw.nrows()),
            });
        }

        let mut labels = vec![UNMATCHED; n];
        let mut raw_index: Vec<usize> = (0..n).collect();
        let mut pending: Array2<f64> = weighted.to_owned();

        let mut rep_rows: Vec<f64> = Vec::new();
        // Doubles as the accumulated representative count: global label k is
        // row k of the final representative matrix.
        let mut label_offset = 0usize;
        let mut file_index = 0usize;
        let mut rounds = 0usize;

        for round in 0..MAX_ROUNDS {
            rounds = round + 1;

            let sample = self.sample_pending(&pending)?;
            debug!(
                round,
                pending = pending.nrows(),
                sample = sample.nrows(),
                "cascade round"
            );

            let clusters = self.clusterer.cluster(sample.view(), self.config.threshold)?;
            let representatives = centroids(sample.view(), &clusters);

            let result = match_to_representatives(
                pending.view(),
                representatives.view(),
                self.config.threshold,
            );
            debug!(
                round,
                clusters = clusters.len(),
                matched = result.matched_count(),
                mismatched = result.unmatched.len(),
                "matched against round representatives"
            );

            // Commit this round's labels before the working set shrinks.
            // The first write wins; a row never re-enters the cascade.
            for (pos, &local) in result.labels.iter().enumerate() {
                if local == UNMATCHED {
                    continue;
                }
                let original = raw_index[pos];
                if labels[original] == UNMATCHED {
                    labels[original] = local + label_offset as i64;
                }
            }

            if self.config.save_file {
                file_index = self.persist_round(
                    sink,
                    raw,
                    &raw_index,
                    &result.labels,
                    representatives.nrows(),
                    file_index,
                );
            }

            // The offset tracks representatives produced, not labels seen,
            // so a round that matches everything stays consistent with one
            // that leaves a remainder.
            label_offset += representatives.nrows();
            rep_rows.extend(representatives.iter().copied());

            raw_index = result.unmatched.iter().map(|&pos| raw_index[pos]).collect();
            pending = pending.select(Axis(0), &result.unmatched);

            if pending.nrows() == 0 {
                break;
            }
        }

        let rep_count = label_offset;
        let representatives = Array2::from_shape_vec((rep_count, m), rep_rows)
            .map_err(|e| Error::Other(e.to_string()))?;

        if self.config.save_file && !raw_index.is_empty() {
            let rows = raw_index
                .iter()
                .map(|&original| indexed_row(raw, original))
                .collect();
            sink.save_mismatch(rows);
        }
        sink.save_representatives(representatives.view());
        sink.finish();

        let distinct: HashSet<i64> = labels.iter().copied().filter(|&l| l != UNMATCHED).collect();
        if raw_index.is_empty() {
            // Converged: every pattern must own at least one row, otherwise
            // labels and representatives silently disagree.
            if distinct.len() != rep_count {
                return Err(Error::LabelInvariant {
                    labels: distinct.len(),
                    representatives: rep_count,
                });
            }
            info!(rounds, patterns = rep_count, "cascade converged");
        } else {
            warn!(
                rounds,
                unmatched = raw_index.len(),
                "round budget exhausted with rows left unmatched"
            );
        }

        Ok(CascadeOutcome {
            labels,
            representatives,
            unmatched: raw_index,
            rounds,
        })
    }

    /// Sub-sample the working set while it is large; fall back to the full
    /// set when it is small or the sample collapses to a single row.
    fn sample_pending(&self, pending: &Array2<f64>) -> Result<Array2<f64>> {
        if pending.nrows() < SAMPLE_FLOOR {
            return Ok(pending.clone());
        }
        let sample = stride_sample(pending.view(), self.config.sample_rate)?;
        if sample.nrows() <= 1 {
            return Ok(pending.clone());
        }
        Ok(sample)
    }

    /// Group this round's matches by local id and hand them to the sink.
    ///
    /// The file index advances by the round's representative count even
    /// when some groups are empty, keeping file names aligned with global
    /// labels.
    fn persist_round(
        &self,
        sink: &dyn ClusterSink,
        raw: ArrayView2<'_, f64>,
        raw_index: &[usize],
        local_labels: &[i64],
        representatives: usize,
        file_index: usize,
    ) -> usize {
        let mut groups: Vec<Vec<IndexedRow>> = vec![Vec::new(); representatives];
        for (pos, &local) in local_labels.iter().enumerate() {
            if local == UNMATCHED {
                continue;
            }
            let original = raw_index[pos];
            groups[local as usize].push(indexed_row(raw, original));
        }
        for (k, rows) in groups.into_iter().enumerate() {
            if !rows.is_empty() {
                sink.save_cluster(file_index + k, rows);
            }
        }
        file_index + representatives
    }
}

fn indexed_row(raw: ArrayView2<'_, f64>, original: usize) -> IndexedRow {
    IndexedRow {
        index: original,
        values: raw.row(original).to_vec(),
    }
}

/// Weight an occurrence matrix against its KPI series and cascade it.
///
/// Input values are coerced to presence/absence first; the cascade then
/// runs with the default complete-linkage backend and no persistence.
pub fn cluster_events(
    matrix: ArrayView2<'_, f64>,
    kpi: ArrayView1<'_, f64>,
    config: &CascadeConfig,
) -> Result<CascadeOutcome> {
    let binary = binarize(matrix);
    let weighted = EventWeighting::default().weigh(binary.view(), kpi)?;
    Cascade::new(config.clone()).run(weighted.matrix.view())
}
