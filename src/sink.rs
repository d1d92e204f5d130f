//! Persistence boundary for matched clusters.
//!
//! The cascade controller never touches the filesystem. When persistence is
//! enabled it hands matched groups, leftover mismatches, and the final
//! representative table to a [`ClusterSink`]; the in-memory labeling is
//! correct with or without one.
//!
//! [`CsvSink`] is the bundled implementation: delimited text files under one
//! output directory, written by an internal worker pool. Every submission
//! captures an immutable snapshot of its rows, so background writes never
//! race the round loop. Write failures are logged and isolated; they must
//! not abort clustering.

use ndarray::ArrayView2;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use std::sync::{Arc, Condvar, Mutex};
use tracing::warn;

/// One persisted row: the original row id plus its unweighted values.
#[derive(Debug, Clone)]
pub struct IndexedRow {
    /// Row position in the original occurrence matrix.
    pub index: usize,
    /// Unweighted row values.
    pub values: Vec<f64>,
}

/// Capability for persisting cascade output.
///
/// Implementations own their error handling: a failed write is theirs to
/// report, never the controller's to unwind.
pub trait ClusterSink: Send + Sync {
    /// Persist one matched group under a running file index.
    fn save_cluster(&self, file_index: usize, rows: Vec<IndexedRow>) {
        let _ = (file_index, rows);
    }

    /// Persist the rows that never matched any representative.
    fn save_mismatch(&self, rows: Vec<IndexedRow>) {
        let _ = rows;
    }

    /// Persist the accumulated representative matrix.
    fn save_representatives(&self, representatives: ArrayView2<'_, f64>) {
        let _ = representatives;
    }

    /// Wait for all outstanding background work.
    fn finish(&self) {}
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ClusterSink for NullSink {}

/// Comma-delimited file sink with a background worker pool.
pub struct CsvSink {
    dir: PathBuf,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
    #[cfg(feature = "parallel")]
    pending: Arc<(Mutex<usize>, Condvar)>,
}

impl CsvSink {
    /// Create the output directory and the worker pool.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Other(format!("create {}: {e}", dir.display())))?;
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .build()
            .map_err(|e| Error::Other(format!("sink worker pool: {e}")))?;
        Ok(Self {
            dir,
            #[cfg(feature = "parallel")]
            pool,
            #[cfg(feature = "parallel")]
            pending: Arc::new((Mutex::new(0), Condvar::new())),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(feature = "parallel")]
    fn submit<F>(&self, what: &'static str, job: F)
    where
        F: FnOnce() -> io::Result<()> + Send + 'static,
    {
        let pending = Arc::clone(&self.pending);
        *pending.0.lock().expect("sink counter poisoned") += 1;
        self.pool.spawn(move || {
            if let Err(err) = job() {
                warn!(%err, what, "cluster persistence failed");
            }
            let (count, signal) = &*pending;
            *count.lock().expect("sink counter poisoned") -= 1;
            signal.notify_all();
        });
    }

    #[cfg(not(feature = "parallel"))]
    fn submit<F>(&self, what: &'static str, job: F)
    where
        F: FnOnce() -> io::Result<()> + Send + 'static,
    {
        if let Err(err) = job() {
            warn!(%err, what, "cluster persistence failed");
        }
    }
}

impl ClusterSink for CsvSink {
    fn save_cluster(&self, file_index: usize, rows: Vec<IndexedRow>) {
        let path = self.dir.join(format!("{file_index}.csv"));
        self.submit("cluster", move || write_rows(&path, &rows));
    }

    fn save_mismatch(&self, rows: Vec<IndexedRow>) {
        let path = self.dir.join("mismatch.csv");
        self.submit("mismatch", move || write_rows(&path, &rows));
    }

    fn save_representatives(&self, representatives: ArrayView2<'_, f64>) {
        let path = self.dir.join("representatives.csv");
        if let Err(err) = write_representatives(&path, representatives) {
            warn!(%err, "representative persistence failed");
        }
    }

    fn finish(&self) {
        #[cfg(feature = "parallel")]
        {
            let (count, signal) = &*self.pending;
            let mut outstanding = count.lock().expect("sink counter poisoned");
            while *outstanding > 0 {
                outstanding = signal.wait(outstanding).expect("sink counter poisoned");
            }
        }
    }
}

fn write_rows(path: &Path, rows: &[IndexedRow]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in rows {
        write!(out, "{}", row.index)?;
        for value in &row.values {
            write!(out, ",{value}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}

fn write_representatives(path: &Path, representatives: ArrayView2<'_, f64>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in representatives.rows() {
        let mut first = true;
        for value in row.iter() {
            if first {
                write!(out, "{value:.6}")?;
                first = false;
            } else {
                write!(out, ",{value:.6}")?;
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn row(index: usize, values: &[f64]) -> IndexedRow {
        IndexedRow {
            index,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_csv_sink_writes_cluster_files() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path().join("out")).unwrap();

        sink.save_cluster(0, vec![row(3, &[1.0, 0.0]), row(7, &[1.0, 1.0])]);
        sink.save_cluster(1, vec![row(5, &[0.0, 1.0])]);
        sink.finish();

        let first = std::fs::read_to_string(sink.dir().join("0.csv")).unwrap();
        assert_eq!(first, "3,1,0\n7,1,1\n");
        let second = std::fs::read_to_string(sink.dir().join("1.csv")).unwrap();
        assert_eq!(second, "5,0,1\n");
    }

    #[test]
    fn test_csv_sink_writes_mismatch_and_representatives() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path()).unwrap();

        sink.save_mismatch(vec![row(9, &[0.0, 0.0])]);
        sink.save_representatives(array![[0.5, 1.0]].view());
        sink.finish();

        let mismatch = std::fs::read_to_string(sink.dir().join("mismatch.csv")).unwrap();
        assert_eq!(mismatch, "9,0,0\n");
        let reps = std::fs::read_to_string(sink.dir().join("representatives.csv")).unwrap();
        assert_eq!(reps, "0.500000,1.000000\n");
    }

    #[test]
    fn test_finish_is_a_barrier_for_many_submissions() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path()).unwrap();

        for i in 0..32 {
            sink.save_cluster(i, vec![row(i, &[i as f64])]);
        }
        sink.finish();

        for i in 0..32 {
            assert!(sink.dir().join(format!("{i}.csv")).exists());
        }
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let sink = NullSink;
        sink.save_cluster(0, vec![row(0, &[1.0])]);
        sink.save_mismatch(Vec::new());
        sink.save_representatives(array![[1.0]].view());
        sink.finish();
    }
}
