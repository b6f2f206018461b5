//! Pairwise dissimilarity kernels.
//!
//! Every kernel takes two equal-length slices and returns a scalar distance
//! (lower = more similar).
//!
//! | Kernel | Formula | Range | Metric? |
//! |--------|---------|-------|---------|
//! | [`euclidean`] | `sqrt(Σ(x[i] - y[i])²)` | `[0, inf)` | yes |
//! | [`manhattan`] | `Σ|x[i] - y[i]|` | `[0, inf)` | yes |
//! | [`centered_pearson`] | `1 - r²` | `[0, 1]` | no |
//! | [`cosine`] | `1 - cos(x, y)` | `[0, 2]` | no |
//!
//! Lengths are checked up front: a mismatch is a
//! [`DistanceError::DimensionMismatch`], never a short read. The two
//! normalized kernels refuse zero-norm operands with
//! [`DistanceError::DegenerateInput`] rather than returning `NaN`.

use crate::error::{DistanceError, Result};

#[inline]
pub(crate) fn check_dims(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() == y.len() {
        Ok(())
    } else {
        Err(DistanceError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        })
    }
}

/// Dot product `Σ(x[i] * y[i])`, without a length check.
///
/// Mismatched lengths use the shorter length. Returns 0.0 for empty input.
#[inline]
#[must_use]
pub fn dot_portable(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

/// Dot product of two equal-length vectors.
///
/// # Example
///
/// ```rust
/// let d = dissim::kernel::dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(d, 32.0);
/// ```
#[inline]
pub fn dot(x: &[f64], y: &[f64]) -> Result<f64> {
    check_dims(x, y)?;
    Ok(dot_portable(x, y))
}

/// Squared L2 norm `Σ(v[i]²)`.
#[inline]
#[must_use]
pub fn norm_squared(v: &[f64]) -> f64 {
    dot_portable(v, v)
}

/// Squared Euclidean distance: `Σ(x[i] - y[i])²`.
///
/// Cheaper than [`euclidean`] when only the ordering of distances matters.
#[inline]
pub fn euclidean_squared(x: &[f64], y: &[f64]) -> Result<f64> {
    check_dims(x, y)?;
    Ok(x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum())
}

/// Euclidean (L2) distance: `sqrt(Σ(x[i] - y[i])²)`.
///
/// Returns `0.0` for empty vectors.
///
/// # Example
///
/// ```rust
/// use dissim::kernel::euclidean;
///
/// let d = euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
/// assert!((d - 5.0).abs() < 1e-12);
/// ```
#[inline]
pub fn euclidean(x: &[f64], y: &[f64]) -> Result<f64> {
    euclidean_squared(x, y).map(f64::sqrt)
}

/// Manhattan (L1) distance: `Σ|x[i] - y[i]|`.
///
/// Returns `0.0` for empty vectors.
///
/// # Example
///
/// ```rust
/// use dissim::kernel::manhattan;
///
/// // |1-0| + |2-0| + |3-0|
/// assert_eq!(manhattan(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]).unwrap(), 6.0);
/// ```
#[inline]
pub fn manhattan(x: &[f64], y: &[f64]) -> Result<f64> {
    check_dims(x, y)?;
    Ok(x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum())
}

/// Largest absolute component, `0.0` for empty or all-zero input.
#[inline]
fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, a| m.max(a.abs()))
}

/// One pass over both vectors, each divided by its scale:
/// `(Σxy, Σxx, Σyy)` of `x / sx` and `y / sy`.
#[inline]
fn scaled_cross_sums(x: &[f64], sx: f64, y: &[f64], sy: f64) -> (f64, f64, f64) {
    let mut xy = 0.0;
    let mut xx = 0.0;
    let mut yy = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let (a, b) = (a / sx, b / sy);
        xy += a * b;
        xx += a * a;
        yy += b * b;
    }
    (xy, xx, yy)
}

/// Correlation-style ratio `xy / sqrt(xx * yy)` with zero-norm rejection.
///
/// Both operands are scaled by their largest component first. The ratio is
/// scale-invariant and the scaled sums stay in `[1, n]`, so neither the sums
/// nor their product can overflow or underflow.
#[inline]
fn normalized_product(x: &[f64], y: &[f64]) -> Result<f64> {
    check_dims(x, y)?;
    let sx = max_abs(x);
    if sx == 0.0 {
        return Err(DistanceError::DegenerateInput {
            reason: "first vector has zero norm".into(),
        });
    }
    let sy = max_abs(y);
    if sy == 0.0 {
        return Err(DistanceError::DegenerateInput {
            reason: "second vector has zero norm".into(),
        });
    }

    let (xy, xx, yy) = scaled_cross_sums(x, sx, y, sy);
    Ok(xy / (xx * yy).sqrt())
}

/// Centered Pearson dissimilarity: `1 - r²`, where
/// `r = Σxy / sqrt(Σx² · Σy²)`.
///
/// # Caller Obligation
///
/// Both vectors must already be zero-mean. This kernel does not center its
/// input; on uncentered data the result is not a correlation distance.
///
/// # Properties
///
/// - Perfectly correlated or anti-correlated vectors give `0.0`.
/// - Uncorrelated vectors give `1.0`.
/// - Does **not** satisfy the triangle inequality.
///
/// # Errors
///
/// [`DistanceError::DimensionMismatch`] on differing lengths,
/// [`DistanceError::DegenerateInput`] if either vector has zero norm
/// (including empty vectors).
///
/// # Example
///
/// ```rust
/// use dissim::kernel::centered_pearson;
///
/// let d = centered_pearson(&[1.0, -1.0], &[2.0, -2.0]).unwrap();
/// assert!(d.abs() < 1e-12);
/// ```
#[inline]
pub fn centered_pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    let r = normalized_product(x, y)?;
    Ok(1.0 - r * r)
}

/// Cosine dissimilarity: `1 - Σxy / sqrt(Σx² · Σy²)`.
///
/// Range `[0, 2]`: 0 for parallel, 1 for orthogonal, 2 for opposite vectors.
///
/// # Not a Metric
///
/// Cosine dissimilarity does not satisfy the triangle inequality. Do not use
/// it with neighbor-search structures that prune by triangle bounds.
///
/// # Errors
///
/// Same as [`centered_pearson`].
///
/// # Example
///
/// ```rust
/// use dissim::kernel::cosine;
///
/// assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 1.0);
/// assert!(cosine(&[0.0, 0.0], &[1.0, 1.0]).is_err());
/// ```
#[inline]
pub fn cosine(x: &[f64], y: &[f64]) -> Result<f64> {
    Ok(1.0 - normalized_product(x, y)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_dot_basic() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0);
        assert_eq!(dot(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_norm_squared() {
        assert_eq!(norm_squared(&[3.0, 4.0]), 25.0);
    }

    #[test]
    fn test_euclidean_3_4_5() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap() - 5.0).abs() < EPS);
        assert!((euclidean_squared(&[0.0, 0.0], &[3.0, 4.0]).unwrap() - 25.0).abs() < EPS);
    }

    #[test]
    fn test_empty_vectors_are_zero_distance() {
        assert_eq!(euclidean(&[], &[]).unwrap(), 0.0);
        assert_eq!(manhattan(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_manhattan_basic() {
        assert_eq!(manhattan(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]).unwrap(), 6.0);
        // |1-4| + |2-0| = 5
        assert_eq!(manhattan(&[1.0, 2.0], &[4.0, 0.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_dimension_mismatch_reports_lengths() {
        let err = euclidean(&[1.0, 2.0, 3.0], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            DistanceError::DimensionMismatch {
                expected: 3,
                actual: 1
            }
        );
        assert!(manhattan(&[1.0], &[]).is_err());
        assert!(cosine(&[1.0], &[1.0, 0.0]).is_err());
        assert!(centered_pearson(&[1.0, -1.0], &[1.0]).is_err());
    }

    #[test]
    fn test_mismatch_checked_before_degenerate() {
        // zero vector AND wrong length: the length wins
        let err = cosine(&[0.0, 0.0], &[1.0]).unwrap_err();
        assert!(matches!(err, DistanceError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_pearson_correlated_and_anticorrelated() {
        assert!(centered_pearson(&[1.0, -1.0], &[2.0, -2.0]).unwrap().abs() < EPS);
        assert!(centered_pearson(&[1.0, -1.0], &[-3.0, 3.0]).unwrap().abs() < EPS);
    }

    #[test]
    fn test_pearson_uncorrelated() {
        let d = centered_pearson(&[1.0, -1.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();
        assert!((d - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cosine_orthogonal_parallel_opposite() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 1.0);
        assert!(cosine(&[1.0, 0.0], &[2.0, 0.0]).unwrap().abs() < EPS);
        assert!((cosine(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_cosine_known_value() {
        // dot = 32, |a|² = 14, |b|² = 77
        let expected = 1.0 - 32.0 / (14.0f64 * 77.0).sqrt();
        let d = cosine(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert!((d - expected).abs() < EPS);
    }

    #[test]
    fn test_zero_norm_is_degenerate() {
        let kernels: [fn(&[f64], &[f64]) -> Result<f64>; 2] = [cosine, centered_pearson];
        for f in kernels {
            let err = f(&[0.0, 0.0], &[1.0, 1.0]).unwrap_err();
            assert!(matches!(err, DistanceError::DegenerateInput { .. }));
            let err = f(&[1.0, 1.0], &[0.0, 0.0]).unwrap_err();
            assert!(matches!(err, DistanceError::DegenerateInput { .. }));
            assert!(f(&[], &[]).is_err());
        }
    }

    #[test]
    fn test_tiny_norms_do_not_underflow() {
        // Σx² rounds to zero below ~1e-162 per component.
        let a = [1e-170, -1e-170];
        let b = [2e-170, -2e-170];
        let d = cosine(&a, &b).unwrap();
        assert!(d.abs() < EPS, "{}", d);
        assert!(centered_pearson(&a, &b).unwrap().abs() < EPS);
    }

    #[test]
    fn test_huge_norms_do_not_overflow() {
        // Σx² overflows above ~1e154 per component.
        let a = [1e200, 0.0];
        let b = [0.0, 1e200];
        assert!((cosine(&a, &b).unwrap() - 1.0).abs() < EPS);
        assert!(cosine(&a, &a).unwrap().abs() < EPS);
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(&[]), 0.0);
        assert_eq!(max_abs(&[-0.0, 0.0]), 0.0);
        assert_eq!(max_abs(&[1.0, -3.0, 2.0]), 3.0);
    }
}
