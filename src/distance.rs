//! Pairwise squared Euclidean distances.
//!
//! Every c-means iteration needs the full N×K table of squared distances
//! between the points and the current centers:
//!
//! ```text
//! D[i, j] = ||xᵢ - cⱼ||² = Σ_d (x_id - c_jd)²
//! ```
//!
//! The table is recomputed from scratch each iteration and never cached.
//! Callers that already own a faster routine (BLAS, GPU, a different metric
//! with the same contract) can plug it in through [`PairwiseDistance`].

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

#[cfg(feature = "parallel")]
use ndarray::Axis;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A routine producing the N×K distance table between two point sets.
pub trait PairwiseDistance: Sync {
    /// Distances between every row of `a` and every row of `b`.
    ///
    /// Must fail with [`Error::DimensionMismatch`] when the column counts
    /// differ, and must return non-negative entries.
    fn pairwise(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Squared Euclidean distance, the metric c-means is defined over.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl PairwiseDistance for SquaredEuclidean {
    fn pairwise(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        squared_euclidean(a, b)
    }
}

/// Squared distance between two points of equal length.
#[inline]
pub(crate) fn squared_distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// N×K matrix of squared Euclidean distances between rows of `a` and rows of `b`.
///
/// Neither input is modified.
///
/// # Example
///
/// ```rust
/// use cmeans::distance::squared_euclidean;
/// use ndarray::array;
///
/// let points = array![[0.0, 0.0], [3.0, 4.0]];
/// let centers = array![[0.0, 0.0]];
/// let d = squared_euclidean(points.view(), centers.view()).unwrap();
/// assert_eq!(d[[1, 0]], 25.0);
/// ```
pub fn squared_euclidean(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    if a.ncols() != b.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.ncols(),
            found: b.ncols(),
        });
    }

    let mut out = Array2::zeros((a.nrows(), b.nrows()));

    #[cfg(feature = "parallel")]
    {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, mut row)| {
                let point = a.row(i);
                for (j, slot) in row.iter_mut().enumerate() {
                    *slot = squared_distance(&point, &b.row(j));
                }
            });
    }

    #[cfg(not(feature = "parallel"))]
    for (i, mut row) in out.rows_mut().into_iter().enumerate() {
        let point = a.row(i);
        for (j, slot) in row.iter_mut().enumerate() {
            *slot = squared_distance(&point, &b.row(j));
        }
    }

    Ok(out)
}
