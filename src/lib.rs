//! # cmeans
//!
//! Soft clustering by alternating optimization: fuzzy ("probabilistic") and
//! possibilistic c-means over `ndarray` matrices.
//!
//! - [`cluster`]: the estimator, the two update kernels, initialization, and
//!   hard-label extraction.
//! - [`distance`]: the pairwise squared-distance table every iteration needs.
//! - [`preprocess`]: centering and scaling with an exact undo.
//! - [`metrics`]: agreement scores against known labels.
//!
//! ```rust
//! use cmeans::{Algorithm, CMeans};
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.1], [0.2, 0.0], [5.0, 5.1], [5.2, 4.9]];
//! let fit = CMeans::new(2)
//!     .with_algorithm(Algorithm::Possibilistic)
//!     .with_seed(1)
//!     .fit(x.view())
//!     .unwrap();
//!
//! assert_eq!(fit.memberships().dim(), (4, 2));
//! assert_eq!(fit.centers().dim(), (2, 2));
//! assert!(fit.inertia() > 0.0);
//! ```
//!
//! Enable the `parallel` feature to run restarts and distance rows on rayon.

pub mod cluster;
pub mod distance;
/// Error types used across `cmeans`.
pub mod error;
pub mod metrics;
pub mod preprocess;

pub use cluster::{
    labels_from_memberships, Algorithm, CMeans, CMeansFit, Clustering, Init, SoftClustering,
    Termination,
};
pub use distance::{squared_euclidean, PairwiseDistance, SquaredEuclidean};
pub use error::{Error, Result};
pub use metrics::{ari, completeness, homogeneity, v_measure};
pub use preprocess::Standardizer;
