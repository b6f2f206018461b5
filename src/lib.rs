//! Pairwise dissimilarity kernels for embedding and neighbor-graph pipelines.
//!
//! `dissim` provides the distance primitive a dimensionality-reduction
//! pipeline calls when it builds a nearest-neighbor graph:
//!
//! - **Kernels**: [`kernel::euclidean`], [`kernel::manhattan`],
//!   [`kernel::centered_pearson`], [`kernel::cosine`]
//! - **One-to-many dispatch**: [`batch_distance`] and friends in [`batch`]
//! - **Row access**: the [`Rows`] trait and the [`RowMatrix`] container
//!
//! # Metric Selection Guide
//!
//! | Metric | Range | Triangle inequality | Input requirement |
//! |--------|-------|---------------------|-------------------|
//! | Euclidean | `[0, inf)` | yes | none |
//! | Manhattan | `[0, inf)` | yes | none |
//! | CenteredPearson | `[0, 1]` | **no** | zero-mean vectors |
//! | Cosine | `[0, 2]` | **no** | non-zero vectors |
//!
//! This crate does not center, normalize or otherwise preprocess data, and
//! it does not pick a metric. Both are caller decisions.
//!
//! # Errors
//!
//! Every operation validates up front and returns a [`DistanceError`]
//! instead of reading out of bounds or producing `NaN`:
//! mismatched lengths, out-of-range row indices, and zero-norm vectors under
//! the normalized metrics.
//!
//! # Indexing
//!
//! Row indices are 0-based. [`batch::batch_distance_one_based`] accepts
//! 1-based signed indices for hosts that number rows from 1.
//!
//! # Features
//!
//! - `parallel`: rayon-backed [`batch::par_batch_distance`]
//! - `serde`: `Serialize`/`Deserialize` for [`MetricKind`]
//!
//! # Example
//!
//! ```rust
//! use dissim::{batch_distance, distance, MetricKind};
//!
//! let d = distance(MetricKind::Euclidean, &[0.0, 0.0], &[3.0, 4.0]).unwrap();
//! assert!((d - 5.0).abs() < 1e-12);
//!
//! let m = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
//! let ds = batch_distance(MetricKind::Cosine, &m, 0, &[1, 0]).unwrap();
//! assert_eq!(ds.len(), 2);
//! assert!((ds[0] - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
mod error;
pub mod kernel;
mod matrix;
pub mod metric;

pub use batch::batch_distance;
#[cfg(feature = "parallel")]
pub use batch::par_batch_distance;
pub use error::{DistanceError, Result};
pub use matrix::{RowMatrix, Rows};
pub use metric::{Metric, MetricKind};

/// Distance between `x` and `y` under `metric`.
///
/// # Errors
///
/// - [`DistanceError::DimensionMismatch`] if the lengths differ.
/// - [`DistanceError::DegenerateInput`] if `metric` is
///   [`MetricKind::CenteredPearson`] or [`MetricKind::Cosine`] and either
///   vector has zero norm.
#[inline]
pub fn distance(metric: MetricKind, x: &[f64], y: &[f64]) -> Result<f64> {
    metric.eval(x, y)
}
