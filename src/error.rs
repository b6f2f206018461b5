//! Error type shared by kernels and batch dispatch.

use thiserror::Error;

/// Contract violations reported by every fallible operation in this crate.
///
/// All variants are recoverable: a caller can skip the offending pair,
/// fix its indices, or re-request with a different metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistanceError {
    /// Operand lengths differ.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the first operand (the origin row in a batch).
        expected: usize,
        /// Length of the offending operand.
        actual: usize,
    },

    /// A row index fell outside `[0, bound)`.
    #[error("row index {index} out of range for {bound} rows")]
    IndexOutOfRange {
        /// The offending index, 0-based. Signed so host-side conversions
        /// (e.g. a 1-based `0`) can be reported faithfully.
        index: i64,
        /// Number of rows in the matrix.
        bound: usize,
    },

    /// A normalized metric received a zero-norm vector.
    #[error("degenerate input: {reason}")]
    DegenerateInput {
        /// Which operand was degenerate.
        reason: String,
    },

    /// A metric name did not match any [`crate::MetricKind`].
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DistanceError>;

impl DistanceError {
    pub(crate) fn out_of_range(index: impl TryInto<i64>, bound: usize) -> Self {
        Self::IndexOutOfRange {
            index: index.try_into().unwrap_or(i64::MAX),
            bound,
        }
    }
}
