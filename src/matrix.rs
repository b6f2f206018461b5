//! Row access for batch dispatch.
//!
//! The dispatcher only needs "how many rows" and "give me row `i`". Data
//! loading belongs to the caller, so anything that can hand out `&[f64]`
//! rows can implement [`Rows`].
//!
//! # Memory Layout
//!
//! [`RowMatrix`] stores rows contiguously (row-major):
//!
//! ```text
//! [r0_c0, r0_c1, r0_c2] [r1_c0, r1_c1, r1_c2] ...
//!         row 0                 row 1
//! data[i * cols + c] = row i, column c
//! ```
//!
//! One-to-many dispatch reads the origin once and each target row front to
//! back, so the horizontal layout is already sequential.

use crate::error::{DistanceError, Result};

/// Read-only row access, indexed from 0.
pub trait Rows {
    /// Number of rows.
    fn n_rows(&self) -> usize;

    /// Row `i`, or `None` if `i >= n_rows()`.
    fn row(&self, i: usize) -> Option<&[f64]>;
}

/// Dense row-major matrix with a fixed column count.
///
/// # Example
///
/// ```rust
/// use dissim::{RowMatrix, Rows};
///
/// let m = RowMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m.n_rows(), 2);
/// assert_eq!(m.row(1), Some(&[3.0, 4.0][..]));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowMatrix {
    /// Data in row-major order: data[i * cols + c]
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl RowMatrix {
    /// Build from per-row vectors.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DimensionMismatch`] if any row's length differs from
    /// the first row's.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let cols = first.as_ref().len();

        let mut data = Vec::with_capacity(cols * rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(DistanceError::DimensionMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Wrap flat row-major data.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_flat(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        let expected = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(DistanceError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from column-major data, as handed over by hosts that store
    /// matrices column by column.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_col_major(data: &[f64], rows: usize, cols: usize) -> Result<Self> {
        let expected = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(DistanceError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }

        // Transpose: column-major → row-major
        let mut out = vec![0.0f64; expected];
        for c in 0..cols {
            for i in 0..rows {
                out[i * cols + c] = data[c * rows + i];
            }
        }

        Ok(Self {
            data: out,
            rows,
            cols,
        })
    }

    /// Number of columns (the dimension of every row).
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Flat row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| &self.data[i * self.cols..(i + 1) * self.cols])
    }
}

impl Rows for RowMatrix {
    #[inline]
    fn n_rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.rows {
            let start = i * self.cols;
            self.data.get(start..start + self.cols)
        } else {
            None
        }
    }
}

impl Rows for [Vec<f64>] {
    #[inline]
    fn n_rows(&self) -> usize {
        self.len()
    }

    #[inline]
    fn row(&self, i: usize) -> Option<&[f64]> {
        self.get(i).map(Vec::as_slice)
    }
}

impl Rows for Vec<Vec<f64>> {
    #[inline]
    fn n_rows(&self) -> usize {
        self.len()
    }

    #[inline]
    fn row(&self, i: usize) -> Option<&[f64]> {
        self.as_slice().row(i)
    }
}

impl Rows for [&[f64]] {
    #[inline]
    fn n_rows(&self) -> usize {
        self.len()
    }

    #[inline]
    fn row(&self, i: usize) -> Option<&[f64]> {
        self.get(i).copied()
    }
}

impl<M: Rows + ?Sized> Rows for &M {
    #[inline]
    fn n_rows(&self) -> usize {
        (**self).n_rows()
    }

    #[inline]
    fn row(&self, i: usize) -> Option<&[f64]> {
        (**self).row(i)
    }
}
