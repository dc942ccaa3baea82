//! Fuzzy and possibilistic c-means.
//!
//! ## Hard vs Soft Clustering
//!
//! **Hard clustering** assigns each item to exactly one cluster. Simple, but
//! loses information when items genuinely sit between groups.
//!
//! **Soft clustering** gives each item a degree of membership in every
//! cluster. C-means comes in two flavours that differ in what a membership
//! means.
//!
//! ## Algorithms
//!
//! ### Fuzzy (probabilistic) c-means
//!
//! Minimizes the weighted within-cluster scatter
//!
//! ```text
//! J = Σᵢ Σⱼ uᵢⱼ^m ||xᵢ - cⱼ||²    subject to  Σⱼ uᵢⱼ = 1
//! ```
//!
//! by alternating two closed-form updates: memberships given centers, then
//! centers given memberships. The constraint makes each row a probability
//! distribution, so a point's memberships are *relative*: an outlier far from
//! everything still splits its unit of membership among the clusters.
//!
//! The fuzziness exponent `m > 1` controls softness. As `m → 1` memberships
//! become hard (k-means); large `m` pushes every row toward uniform.
//!
//! ### Possibilistic c-means
//!
//! Drops the sum-to-one constraint and replaces it with a per-cluster scale ηⱼ.
//! A membership now measures how *typical* a point is of one cluster on its
//! own, so outliers get low membership everywhere. Possibilistic runs start
//! from a converged fuzzy run, which provides both the initial centers and η.
//!
//! ## Restarts and labels
//!
//! Each run converges to a local optimum only. [`CMeans`] repeats the run
//! `n_init` times from different seeds and keeps the lowest objective (its
//! *inertia*). Hard labels are the argmax of each membership row, with ties
//! going to the lowest cluster index.
//!
//! ## Usage
//!
//! ```rust
//! use cmeans::cluster::{Algorithm, CMeans, Clustering, SoftClustering};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = CMeans::new(2).with_seed(7).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let typicality = CMeans::new(2)
//!     .with_algorithm(Algorithm::Possibilistic)
//!     .with_seed(7)
//!     .fit_predict_proba(&data)
//!     .unwrap();
//! assert!(typicality.iter().flatten().all(|&u| (0.0..=1.0).contains(&u)));
//! ```

mod cmeans;
mod init;
mod kernel;
mod labels;
pub mod possibilistic;
pub mod probabilistic;
mod run;
mod traits;

pub use cmeans::{CMeans, CMeansFit};
pub use init::{init_centroids, Init};
pub use kernel::{Algorithm, Kernel};
pub use labels::labels_from_memberships;
pub use run::{iterate, run_single, RunConfig, RunResult, Termination};
pub use traits::{Clustering, SoftClustering};
