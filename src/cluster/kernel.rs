//! Run-time selection between the two update kernels.

use super::{possibilistic, probabilistic};
use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use ndarray::{Array1, Array2, ArrayView2};

/// Which c-means variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Fuzzy c-means: memberships of a point sum to 1.
    #[default]
    Probabilistic,
    /// Possibilistic c-means: independent per-cluster typicality.
    Possibilistic,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Probabilistic => write!(f, "probabilistic"),
            Algorithm::Possibilistic => write!(f, "possibilistic"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "probabilistic" | "fuzzy" => Ok(Algorithm::Probabilistic),
            "possibilistic" => Ok(Algorithm::Possibilistic),
            other => Err(Error::config(
                "algorithm",
                format!(
                    "Algorithm must be 'probabilistic' or 'possibilistic', got '{other}' instead."
                ),
            )),
        }
    }
}

/// An update kernel with everything it needs besides the data.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel {
    /// Fuzzy rules with fuzziness `m`.
    Probabilistic {
        /// Fuzziness exponent.
        m: f64,
    },
    /// Possibilistic rules with fuzziness `m` and fixed per-cluster scales.
    Possibilistic {
        /// Fuzziness exponent.
        m: f64,
        /// Typicality scale of each cluster.
        eta: Array1<f64>,
    },
}

impl Kernel {
    /// Fuzziness exponent.
    pub fn m(&self) -> f64 {
        match self {
            Kernel::Probabilistic { m } | Kernel::Possibilistic { m, .. } => *m,
        }
    }

    /// Which variant this is.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Kernel::Probabilistic { .. } => Algorithm::Probabilistic,
            Kernel::Possibilistic { .. } => Algorithm::Possibilistic,
        }
    }

    /// New memberships from the current distance table.
    pub fn update_memberships(&self, distances: ArrayView2<'_, f64>) -> Array2<f64> {
        match self {
            Kernel::Probabilistic { m } => probabilistic::memberships(distances, *m),
            Kernel::Possibilistic { m, eta } => possibilistic::memberships(distances, eta.view(), *m),
        }
    }

    /// New centers from memberships; empty clusters keep their `previous` row.
    pub fn update_centers(
        &self,
        data: ArrayView2<'_, f64>,
        memberships: ArrayView2<'_, f64>,
        previous: ArrayView2<'_, f64>,
    ) -> Array2<f64> {
        probabilistic::centers(data, memberships, self.m(), previous)
    }

    /// Objective value of a membership/distance pair.
    pub fn objective(&self, memberships: ArrayView2<'_, f64>, distances: ArrayView2<'_, f64>) -> f64 {
        probabilistic::objective(memberships, distances, self.m())
    }

    /// Scales of a possibilistic kernel.
    pub fn scales(&self) -> Option<&Array1<f64>> {
        match self {
            Kernel::Probabilistic { .. } => None,
            Kernel::Possibilistic { eta, .. } => Some(eta),
        }
    }
}
