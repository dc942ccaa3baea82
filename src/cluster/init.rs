//! Initial center selection.
//!
//! A c-means run only converges to a local optimum of its objective, so where
//! the centers start matters. Two strategies are provided:
//!
//! - **Random**: K distinct data rows, chosen uniformly.
//! - **K-means++**: the first center uniformly, each following center with
//!   probability proportional to D(x)², the squared distance to the nearest
//!   center chosen so far. Spreads the seeds out and usually saves restarts.
//!
//! Both draw every random number from the caller's RNG, so a seeded run is
//! reproducible.

use crate::distance::squared_distance;
use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use ndarray::{Array2, ArrayView2};
use rand::prelude::*;

/// Center initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    /// K distinct rows sampled uniformly from the data.
    #[default]
    Random,
    /// D(x)²-weighted seeding.
    KmeansPlusPlus,
}

impl fmt::Display for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Init::Random => write!(f, "random"),
            Init::KmeansPlusPlus => write!(f, "k-means++"),
        }
    }
}

impl FromStr for Init {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(Init::Random),
            "k-means++" | "kmeans++" => Ok(Init::KmeansPlusPlus),
            other => Err(Error::config(
                "init",
                format!("Unknown initialization strategy '{other}', expected 'random' or 'k-means++'."),
            )),
        }
    }
}

/// Produce a K×D matrix of initial centers.
///
/// Every returned row is a copy of a data row, so the result is finite
/// whenever the data is.
///
/// # Errors
///
/// - [`Error::EmptyInput`] when `data` has no rows.
/// - [`Error::InvalidClusterCount`] when `k == 0` or `k > N`.
pub fn init_centroids<R: Rng + ?Sized>(
    data: ArrayView2<'_, f64>,
    k: usize,
    init: Init,
    rng: &mut R,
) -> Result<Array2<f64>> {
    let n = data.nrows();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    if k == 0 || k > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }

    Ok(match init {
        Init::Random => random_rows(data, k, rng),
        Init::KmeansPlusPlus => kmeans_plus_plus(data, k, rng),
    })
}

fn random_rows<R: Rng + ?Sized>(data: ArrayView2<'_, f64>, k: usize, rng: &mut R) -> Array2<f64> {
    let mut centers = Array2::zeros((k, data.ncols()));
    let picked = rand::seq::index::sample(rng, data.nrows(), k);
    for (c, idx) in picked.into_iter().enumerate() {
        centers.row_mut(c).assign(&data.row(idx));
    }
    centers
}

fn kmeans_plus_plus<R: Rng + ?Sized>(
    data: ArrayView2<'_, f64>,
    k: usize,
    rng: &mut R,
) -> Array2<f64> {
    let n = data.nrows();
    let mut centers = Array2::zeros((k, data.ncols()));

    let first = rng.random_range(0..n);
    centers.row_mut(0).assign(&data.row(first));

    // Squared distance of every point to its nearest chosen center.
    let mut nearest: Vec<f64> = data
        .rows()
        .into_iter()
        .map(|p| squared_distance(&p, &centers.row(0)))
        .collect();

    for c in 1..k {
        let total: f64 = nearest.iter().sum();
        let selected = if total > 0.0 && total.is_finite() {
            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = n - 1;
            for (j, &d) in nearest.iter().enumerate() {
                cumsum += d;
                if cumsum >= threshold && d > 0.0 {
                    selected = j;
                    break;
                }
            }
            selected
        } else {
            rng.random_range(0..n)
        };

        centers.row_mut(c).assign(&data.row(selected));
        for (j, p) in data.rows().into_iter().enumerate() {
            let d = squared_distance(&p, &centers.row(c));
            if d < nearest[j] {
                nearest[j] = d;
            }
        }
    }

    centers
}
