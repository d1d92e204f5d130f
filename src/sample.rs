//! Fixed-stride sub-sampling.
//!
//! Clustering cost is quadratic in the number of rows, so large unmatched
//! sets are thinned to every `stride`-th row before the linkage step. The
//! stride walk keeps original relative order and always includes row 0, so
//! a sequence of length `L` yields exactly `ceil(L / stride)` rows.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};

/// Keep every `stride`-th row of `data`, starting at row 0.
pub fn stride_sample(data: ArrayView2<'_, f64>, stride: usize) -> Result<Array2<f64>> {
    if stride == 0 {
        return Err(Error::InvalidParameter {
            name: "stride",
            message: "must be at least 1",
        });
    }
    let picked: Vec<usize> = (0..data.nrows()).step_by(stride).collect();
    Ok(data.select(Axis(0), &picked))
}
