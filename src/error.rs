use core::fmt;

/// Result alias for `weir`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the weighting and cascading-clustering primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Vector/matrix dimension mismatch (usize).
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Condensed distance output had the wrong length twice in a row.
    ///
    /// A single malformed result is recomputed silently; a second one is a
    /// data-integrity fault that must surface to the caller.
    DistanceFault {
        /// Expected number of pairwise distances, `n * (n - 1) / 2`.
        expected: usize,
        /// Length actually produced.
        found: usize,
    },

    /// The number of distinct assigned labels diverged from the number of
    /// accumulated representatives after a fully converged run.
    LabelInvariant {
        /// Distinct non-sentinel labels assigned.
        labels: usize,
        /// Representatives accumulated across all rounds.
        representatives: usize,
    },

    /// Generic error with message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::DistanceFault { expected, found } => {
                write!(
                    f,
                    "condensed distance output has length {found} after recompute, expected {expected}"
                )
            }
            Error::LabelInvariant {
                labels,
                representatives,
            } => {
                write!(
                    f,
                    "{labels} distinct labels assigned but {representatives} representatives accumulated"
                )
            }
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}
