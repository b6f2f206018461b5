//! Metric selection.
//!
//! [`MetricKind`] is the closed set of supported dissimilarities. The
//! [`Metric`] trait is the seam the batch dispatcher is generic over: the
//! zero-sized kernel structs implement it for static dispatch, and
//! `MetricKind` implements it for runtime selection.

use std::fmt;
use std::str::FromStr;

use crate::error::{DistanceError, Result};
use crate::kernel;

/// A pairwise dissimilarity between two equal-length vectors.
///
/// Implementations must be symmetric: `distance(x, y) == distance(y, x)`.
pub trait Metric {
    /// Compute the dissimilarity between `x` and `y`.
    fn distance(&self, x: &[f64], y: &[f64]) -> Result<f64>;
}

/// The supported metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetricKind {
    /// L2 distance.
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// `1 - r²` on zero-mean input.
    CenteredPearson,
    /// `1 - cos(x, y)`.
    Cosine,
}

impl MetricKind {
    /// Every variant, in declaration order.
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Euclidean,
        MetricKind::Manhattan,
        MetricKind::CenteredPearson,
        MetricKind::Cosine,
    ];

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Euclidean => "euclidean",
            MetricKind::Manhattan => "manhattan",
            MetricKind::CenteredPearson => "centered_pearson",
            MetricKind::Cosine => "cosine",
        }
    }

    /// Whether the triangle inequality holds.
    ///
    /// Neighbor-search code that prunes with triangle bounds must check this;
    /// cosine and centered-Pearson dissimilarities are not metrics.
    pub fn is_metric(self) -> bool {
        matches!(self, MetricKind::Euclidean | MetricKind::Manhattan)
    }

    /// Compute the distance under this metric.
    #[inline]
    pub fn eval(self, x: &[f64], y: &[f64]) -> Result<f64> {
        match self {
            MetricKind::Euclidean => kernel::euclidean(x, y),
            MetricKind::Manhattan => kernel::manhattan(x, y),
            MetricKind::CenteredPearson => kernel::centered_pearson(x, y),
            MetricKind::Cosine => kernel::cosine(x, y),
        }
    }
}

impl Metric for MetricKind {
    #[inline]
    fn distance(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        self.eval(x, y)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = DistanceError;

    /// Parse a metric name, case-insensitively.
    ///
    /// `"pearson2"` is accepted as an alias for centered Pearson, matching
    /// the metric names used by R-side UMAP configurations.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(MetricKind::Euclidean),
            "manhattan" => Ok(MetricKind::Manhattan),
            "centered_pearson" | "centeredpearson" | "pearson2" => {
                Ok(MetricKind::CenteredPearson)
            }
            "cosine" => Ok(MetricKind::Cosine),
            _ => Err(DistanceError::UnknownMetric(s.to_string())),
        }
    }
}

macro_rules! unit_metric {
    ($(#[$doc:meta])* $name:ident => $kernel:path) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Metric for $name {
            #[inline]
            fn distance(&self, x: &[f64], y: &[f64]) -> Result<f64> {
                $kernel(x, y)
            }
        }
    };
}

unit_metric!(
    /// Static-dispatch handle for [`kernel::euclidean`].
    Euclidean => kernel::euclidean
);
unit_metric!(
    /// Static-dispatch handle for [`kernel::manhattan`].
    Manhattan => kernel::manhattan
);
unit_metric!(
    /// Static-dispatch handle for [`kernel::centered_pearson`].
    CenteredPearson => kernel::centered_pearson
);
unit_metric!(
    /// Static-dispatch handle for [`kernel::cosine`].
    Cosine => kernel::cosine
);
