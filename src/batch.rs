//! One-to-many distance dispatch.
//!
//! Given a matrix, an origin row and a list of target rows, compute
//! `metric(m[origin], m[targets[i]])` for every `i`, in target order.
//!
//! # Contract
//!
//! - Output position `i` always corresponds to `targets[i]`. Duplicates and
//!   arbitrary ordering are preserved.
//! - Validation is eager and fail-fast. The origin is checked first, then
//!   each target in order; the first bad index (or first row whose length
//!   differs from the origin's) aborts the batch before any kernel runs.
//! - A kernel error (e.g. a zero-norm row under cosine) also aborts the
//!   batch. There are no partial results.
//!
//! All four metrics share one generic path ([`batch_with`]); the per-metric
//! functions are thin wrappers over it.
//!
//! # Index Convention
//!
//! Indices are 0-based. Hosts with 1-based signed indices go through
//! [`batch_distance_one_based`], the only place the shift happens.

use tracing::{debug, trace, trace_span};

use crate::error::{DistanceError, Result};
use crate::matrix::Rows;
use crate::metric::{CenteredPearson, Cosine, Euclidean, Manhattan, Metric, MetricKind};

#[inline]
fn fetch<M: Rows + ?Sized>(m: &M, index: usize) -> Result<&[f64]> {
    m.row(index)
        .ok_or_else(|| DistanceError::out_of_range(index, m.n_rows()))
}

/// Check every index and row length, returning the origin row.
fn validate<'m, M: Rows + ?Sized>(
    m: &'m M,
    origin: usize,
    targets: &[usize],
) -> Result<&'m [f64]> {
    let o = fetch(m, origin)?;
    for &t in targets {
        let row = fetch(m, t)?;
        if row.len() != o.len() {
            return Err(DistanceError::DimensionMismatch {
                expected: o.len(),
                actual: row.len(),
            });
        }
    }
    Ok(o)
}

fn dispatch<K, M>(metric: &K, m: &M, origin: usize, targets: &[usize]) -> Result<Vec<f64>>
where
    K: Metric + ?Sized,
    M: Rows + ?Sized,
{
    let o = validate(m, origin, targets)?;
    targets
        .iter()
        .map(|&t| metric.distance(o, fetch(m, t)?))
        .collect()
}

/// Distances from row `origin` to each row in `targets`, under any [`Metric`].
///
/// # Errors
///
/// - [`DistanceError::IndexOutOfRange`] for the origin, or the first target
///   (in order) that is not a valid row.
/// - [`DistanceError::DimensionMismatch`] for the first target row whose
///   length differs from the origin row.
/// - Any error the metric returns, e.g. [`DistanceError::DegenerateInput`].
///
/// # Example
///
/// ```rust
/// use dissim::batch::batch_with;
/// use dissim::metric::Manhattan;
///
/// let m = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 0.0]];
/// let d = batch_with(&Manhattan, &m, 0, &[2, 1, 2]).unwrap();
/// assert_eq!(d, vec![2.0, 2.0, 2.0]);
/// ```
pub fn batch_with<K, M>(metric: &K, m: &M, origin: usize, targets: &[usize]) -> Result<Vec<f64>>
where
    K: Metric + ?Sized,
    M: Rows + ?Sized,
{
    trace!(origin, targets = targets.len(), "batch dispatch");
    let result = dispatch(metric, m, origin, targets);
    if let Err(ref e) = result {
        debug!(origin, targets = targets.len(), error = %e, "batch rejected");
    }
    result
}

/// Distances from row `origin` to each row in `targets` under `metric`.
///
/// See [`batch_with`] for the ordering and error contract.
///
/// # Example
///
/// ```rust
/// use dissim::{batch_distance, MetricKind};
///
/// let m = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![6.0, 8.0]];
/// let d = batch_distance(MetricKind::Euclidean, &m, 0, &[2, 1]).unwrap();
/// assert_eq!(d, vec![10.0, 5.0]);
///
/// // target == row count: rejected, no partial output
/// assert!(batch_distance(MetricKind::Euclidean, &m, 0, &[1, 3]).is_err());
/// ```
pub fn batch_distance<M: Rows + ?Sized>(
    metric: MetricKind,
    m: &M,
    origin: usize,
    targets: &[usize],
) -> Result<Vec<f64>> {
    let _span = trace_span!("batch_distance", metric = %metric).entered();
    match metric {
        MetricKind::Euclidean => batch_with(&Euclidean, m, origin, targets),
        MetricKind::Manhattan => batch_with(&Manhattan, m, origin, targets),
        MetricKind::CenteredPearson => batch_with(&CenteredPearson, m, origin, targets),
        MetricKind::Cosine => batch_with(&Cosine, m, origin, targets),
    }
}

/// Euclidean distances from `origin` to each target row.
pub fn batch_euclidean<M: Rows + ?Sized>(
    m: &M,
    origin: usize,
    targets: &[usize],
) -> Result<Vec<f64>> {
    batch_with(&Euclidean, m, origin, targets)
}

/// Manhattan distances from `origin` to each target row.
pub fn batch_manhattan<M: Rows + ?Sized>(
    m: &M,
    origin: usize,
    targets: &[usize],
) -> Result<Vec<f64>> {
    batch_with(&Manhattan, m, origin, targets)
}

/// Centered-Pearson dissimilarities from `origin` to each target row.
///
/// Rows must already be zero-mean.
pub fn batch_centered_pearson<M: Rows + ?Sized>(
    m: &M,
    origin: usize,
    targets: &[usize],
) -> Result<Vec<f64>> {
    batch_with(&CenteredPearson, m, origin, targets)
}

/// Cosine dissimilarities from `origin` to each target row.
pub fn batch_cosine<M: Rows + ?Sized>(
    m: &M,
    origin: usize,
    targets: &[usize],
) -> Result<Vec<f64>> {
    batch_with(&Cosine, m, origin, targets)
}

/// Convert a signed host index into a row index in `[0, bound)`.
///
/// # Example
///
/// ```rust
/// use dissim::batch::checked_index;
///
/// assert_eq!(checked_index(2, 3).unwrap(), 2);
/// assert!(checked_index(3, 3).is_err());
/// assert!(checked_index(-1, 3).is_err());
/// ```
pub fn checked_index(index: i64, bound: usize) -> Result<usize> {
    match usize::try_from(index) {
        Ok(i) if i < bound => Ok(i),
        _ => Err(DistanceError::IndexOutOfRange { index, bound }),
    }
}

/// [`batch_distance`] for hosts that number rows from 1.
///
/// `origin` and `targets` are 1-based. Errors report the offending index
/// after the shift to 0-based, so a 1-based `0` is reported as `-1`.
///
/// # Example
///
/// ```rust
/// use dissim::{batch::batch_distance_one_based, MetricKind};
///
/// let m = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
/// let d = batch_distance_one_based(MetricKind::Euclidean, &m, 1, &[2, 1]).unwrap();
/// assert_eq!(d, vec![5.0, 0.0]);
/// ```
pub fn batch_distance_one_based<M: Rows + ?Sized>(
    metric: MetricKind,
    m: &M,
    origin: i64,
    targets: &[i64],
) -> Result<Vec<f64>> {
    let bound = m.n_rows();
    let converted = checked_index(origin.saturating_sub(1), bound).and_then(|o| {
        targets
            .iter()
            .map(|&t| checked_index(t.saturating_sub(1), bound))
            .collect::<Result<Vec<usize>>>()
            .map(|ts| (o, ts))
    });

    match converted {
        Ok((o, ts)) => batch_distance(metric, m, o, &ts),
        Err(e) => {
            debug!(metric = %metric, origin, error = %e, "one-based batch rejected");
            Err(e)
        }
    }
}

/// [`batch_with`], with the per-target kernel calls spread over rayon's pool.
///
/// Same validation order, same first-offending error, same output order as
/// the sequential path.
#[cfg(feature = "parallel")]
pub fn par_batch_with<K, M>(metric: &K, m: &M, origin: usize, targets: &[usize]) -> Result<Vec<f64>>
where
    K: Metric + Sync + ?Sized,
    M: Rows + Sync + ?Sized,
{
    use rayon::prelude::*;

    trace!(origin, targets = targets.len(), "parallel batch dispatch");

    let result = validate(m, origin, targets).and_then(|o| {
        // Collect per-slot results first so the reported error is the
        // lowest-positioned one, not whichever thread lost the race.
        let slots: Vec<Result<f64>> = targets
            .par_iter()
            .map(|&t| metric.distance(o, fetch(m, t)?))
            .collect();
        slots.into_iter().collect()
    });
    if let Err(ref e) = result {
        debug!(origin, targets = targets.len(), error = %e, "parallel batch rejected");
    }
    result
}

/// Parallel [`batch_distance`].
#[cfg(feature = "parallel")]
pub fn par_batch_distance<M: Rows + Sync + ?Sized>(
    metric: MetricKind,
    m: &M,
    origin: usize,
    targets: &[usize],
) -> Result<Vec<f64>> {
    let _span = trace_span!("par_batch_distance", metric = %metric).entered();
    par_batch_with(&metric, m, origin, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::RowMatrix;

    fn grid() -> RowMatrix {
        RowMatrix::from_rows(&[
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![3.0, 4.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_batch_euclidean_order() {
        let d = batch_euclidean(&grid(), 0, &[3, 1, 0]).unwrap();
        assert_eq!(d, vec![5.0, 1.0, 0.0]);
    }

    #[test]
    fn test_batch_manhattan() {
        let d = batch_manhattan(&grid(), 3, &[0, 2]).unwrap();
        assert_eq!(d, vec![7.0, 6.0]);
    }

    #[test]
    fn test_batch_cosine_and_pearson() {
        let m = vec![vec![1.0, -1.0], vec![2.0, -2.0], vec![-1.0, 1.0]];
        let c = batch_cosine(&m, 0, &[1, 2]).unwrap();
        assert!(c[0].abs() < 1e-12);
        assert!((c[1] - 2.0).abs() < 1e-12);

        let p = batch_centered_pearson(&m, 0, &[1, 2]).unwrap();
        assert!(p.iter().all(|d| d.abs() < 1e-12));
    }

    #[test]
    fn test_duplicates_preserved() {
        let d = batch_distance(MetricKind::Euclidean, &grid(), 1, &[3, 3, 0, 3]).unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!(d[0], d[1]);
        assert_eq!(d[0], d[3]);
        assert_eq!(d[2], 1.0);
    }

    #[test]
    fn test_empty_targets() {
        let d = batch_distance(MetricKind::Cosine, &grid(), 1, &[]).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn test_origin_out_of_range() {
        let err = batch_distance(MetricKind::Euclidean, &grid(), 4, &[0]).unwrap_err();
        assert_eq!(err, DistanceError::IndexOutOfRange { index: 4, bound: 4 });
    }

    #[test]
    fn test_first_bad_target_reported() {
        let err = batch_distance(MetricKind::Manhattan, &grid(), 0, &[1, 9, 4]).unwrap_err();
        assert_eq!(err, DistanceError::IndexOutOfRange { index: 9, bound: 4 });
    }

    #[test]
    fn test_index_checked_before_degenerate() {
        // row 0 is zero-norm, but the out-of-range target comes first
        let err = batch_distance(MetricKind::Cosine, &grid(), 1, &[0, 7]).unwrap_err();
        assert!(matches!(err, DistanceError::IndexOutOfRange { index: 7, .. }));
    }

    #[test]
    fn test_degenerate_row_fails_whole_batch() {
        let err = batch_distance(MetricKind::Cosine, &grid(), 1, &[2, 0, 3]).unwrap_err();
        assert!(matches!(err, DistanceError::DegenerateInput { .. }));
    }

    #[test]
    fn test_ragged_rows() {
        let m = vec![vec![1.0, 2.0], vec![1.0], vec![3.0, 4.0]];
        let err = batch_distance(MetricKind::Euclidean, &m, 0, &[2, 1]).unwrap_err();
        assert_eq!(
            err,
            DistanceError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_dynamic_metric_through_batch_with() {
        let m = grid();
        for kind in [MetricKind::Euclidean, MetricKind::Manhattan] {
            let dynamic = batch_with(&kind, &m, 3, &[0, 1, 2]).unwrap();
            let fixed = batch_distance(kind, &m, 3, &[0, 1, 2]).unwrap();
            assert_eq!(dynamic, fixed);
        }
    }

    #[test]
    fn test_checked_index() {
        assert_eq!(checked_index(0, 1).unwrap(), 0);
        assert_eq!(
            checked_index(-3, 5).unwrap_err(),
            DistanceError::IndexOutOfRange { index: -3, bound: 5 }
        );
        assert!(checked_index(0, 0).is_err());
    }

    #[test]
    fn test_one_based_matches_zero_based() {
        let m = grid();
        let one = batch_distance_one_based(MetricKind::Euclidean, &m, 1, &[4, 2, 1]).unwrap();
        let zero = batch_distance(MetricKind::Euclidean, &m, 0, &[3, 1, 0]).unwrap();
        assert_eq!(one, zero);
    }

    #[test]
    fn test_one_based_reports_shifted_index() {
        let m = grid();
        let err = batch_distance_one_based(MetricKind::Euclidean, &m, 1, &[2, 0]).unwrap_err();
        assert_eq!(err, DistanceError::IndexOutOfRange { index: -1, bound: 4 });

        let err = batch_distance_one_based(MetricKind::Euclidean, &m, 5, &[1]).unwrap_err();
        assert_eq!(err, DistanceError::IndexOutOfRange { index: 4, bound: 4 });
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<Vec<f64>> = (0..64)
            .map(|i| vec![i as f64, (i * 7 % 11) as f64 - 5.0, 1.0])
            .collect();
        let targets: Vec<usize> = (0..64).rev().chain([5, 5, 0]).collect();
        for kind in MetricKind::ALL {
            let seq = batch_distance(kind, &rows, 3, &targets).unwrap();
            let par = par_batch_distance(kind, &rows, 3, &targets).unwrap();
            assert_eq!(seq, par);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_reports_first_error() {
        let err = par_batch_distance(MetricKind::Manhattan, &grid(), 0, &[1, 8, 9]).unwrap_err();
        assert_eq!(err, DistanceError::IndexOutOfRange { index: 8, bound: 4 });
    }
}
