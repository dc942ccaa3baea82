//! Clustering traits.
//!
//! Slice-of-rows entry points, for callers that keep points as `Vec<f32>`
//! embeddings rather than `ndarray` matrices.

use crate::error::Result;

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Trait for soft clustering algorithms that return degrees of membership.
pub trait SoftClustering: Clustering {
    /// Fit and return soft cluster assignments.
    ///
    /// Entry \[i\]\[k\] is the membership of point i in cluster k. Whether a
    /// row sums to 1 depends on the algorithm.
    fn fit_predict_proba(&self, data: &[Vec<f32>]) -> Result<Vec<Vec<f64>>>;
}
