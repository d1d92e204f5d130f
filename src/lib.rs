//! # weir
//!
//! Cascading clustering of binary event-occurrence vectors, with the
//! similarity metric biased toward events that correlate with an external
//! performance indicator (KPI).
//!
//! The input is an N×M presence/absence matrix (one row per observation
//! interval, one column per event type) and a length-N KPI series. The
//! pipeline:
//!
//! ```text
//! occurrence matrix + KPI
//!         │
//!         ▼
//!   EventWeighting      ridge correlation + IDF, column scaling
//!         │
//!         ▼
//!      Cascade          repeat: sample → cluster → extract → match
//!         │
//!         ▼
//!  labels + representatives
//! ```
//!
//! Each cascade round clusters only a sub-sample of the still-unmatched
//! rows, matches *everything* against the resulting centroids, and recurses
//! on the mismatched remainder, so millions of rows never meet the
//! quadratic linkage step at full size.
//!
//! ## Quick start
//!
//! ```
//! use ndarray::array;
//! use weir::{cluster_events, CascadeConfig};
//!
//! let events = array![
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//!     [1.0, 1.0, 0.0],
//!     [1.0, 0.0, 1.0],
//! ];
//! let kpi = array![1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! let config = CascadeConfig::default(); // threshold 0.3, sample stride 100
//! let outcome = cluster_events(events.view(), kpi.view(), &config)?;
//!
//! assert_eq!(outcome.labels.len(), 5);
//! assert!(outcome.unmatched.is_empty());
//! assert_eq!(
//!     outcome.representatives.nrows(),
//!     outcome.labels.iter().collect::<std::collections::HashSet<_>>().len(),
//! );
//! # Ok::<(), weir::Error>(())
//! ```
//!
//! Persistence of matched clusters is optional and injected: see
//! [`sink::ClusterSink`] and [`Cascade::run_with_sink`].

pub mod cascade;
pub mod cluster;
pub mod config;
pub mod distance;
/// Error types used across `weir`.
pub mod error;
pub mod matching;
pub mod representative;
pub mod sample;
pub mod sink;
pub mod weighting;

pub use cascade::{cluster_events, Cascade, CascadeOutcome};
pub use cluster::{ClusterSet, Clusterer, CompleteLinkage, Dendrogram};
pub use config::{CascadeConfig, MAX_ROUNDS, SAMPLE_FLOOR};
pub use error::{Error, Result};
pub use matching::{match_to_representatives, RoundMatch, UNMATCHED};
pub use representative::centroids;
pub use sample::stride_sample;
pub use sink::{ClusterSink, CsvSink, IndexedRow, NullSink};
pub use weighting::{binarize, EventWeighting, WeightedEvents};
