//! One complete alternating-optimization run.
//!
//! ```text
//! Initializing ──► Iterating ──┬──► Converged       (center shift < tol)
//!                    ▲   │     └──► MaxIterReached  (n_iter == max_iter)
//!                    └───┘
//! ```
//!
//! Each pass through *Iterating* recomputes the distance table from the
//! current centers, applies the kernel's membership rule, then its center
//! rule, and measures how far the centers moved (sum of squared coordinate
//! differences).
//!
//! The possibilistic variant needs a typicality scale per cluster before it
//! can start. It first runs the fuzzy variant from the same initial centers,
//! fixes η from that result, and then iterates the possibilistic rules
//! starting from the fuzzy centers, within whatever is left of `max_iter`.
//! η is not updated afterwards.
//!
//! Possibilistic clusters are fitted independently of each other, so two
//! centers may slide onto the same dense region and leave a group without a
//! center. When the refined centers of any pair end up closer than `√η / 2`
//! (the smaller η of the pair), the refinement is discarded: the fuzzy
//! centers are kept and the typicalities are evaluated against them.

use super::init::{init_centroids, Init};
use super::kernel::{Algorithm, Kernel};
use super::possibilistic;
use crate::distance::{squared_distance, PairwiseDistance};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Zip};
use rand::Rng;

/// Squared center separation, relative to the smaller η of the pair, below
/// which two possibilistic centers are treated as the same cluster.
const COINCIDENT: f64 = 0.25;

/// Parameters shared by every restart.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of clusters K.
    pub n_clusters: usize,
    /// Fuzziness exponent m (> 1).
    pub m: f64,
    /// Iteration budget per run, shared by both stages of the possibilistic variant.
    pub max_iter: usize,
    /// Stop once the squared center shift falls below this.
    pub tol: f64,
    /// How the first centers are picked.
    pub init: Init,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_clusters: 8,
            m: 2.0,
            max_iter: 300,
            tol: 1e-4,
            init: Init::Random,
        }
    }
}

impl RunConfig {
    /// Reject budgets and exponents the update rules cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::config(
                "max_iter",
                format!(
                    "Number of iterations should be a positive number, got {} instead.",
                    self.max_iter
                ),
            ));
        }
        if !(self.m.is_finite() && self.m > 1.0) {
            return Err(Error::config(
                "m",
                format!(
                    "Fuzziness exponent should be greater than 1, got {} instead.",
                    self.m
                ),
            ));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(Error::config(
                "tol",
                format!(
                    "Tolerance should be a non-negative number, got {} instead.",
                    self.tol
                ),
            ));
        }
        Ok(())
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Center shift dropped below the tolerance.
    Converged,
    /// The iteration budget ran out first.
    MaxIterReached,
}

/// Final state of one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// N×K memberships from the last iteration.
    pub memberships: Array2<f64>,
    /// K×D centers after the last update.
    pub centers: Array2<f64>,
    /// Iterations performed, both stages included for the possibilistic variant.
    pub n_iter: usize,
    /// `Σ uᵢⱼ^m dᵢⱼ` against the final centers.
    pub inertia: f64,
    /// How the (last stage of the) run ended.
    pub termination: Termination,
    /// The kernel that produced the result, η included.
    pub kernel: Kernel,
}

/// Run one initialization plus optimization to termination.
pub fn run_single<R, D>(
    data: ArrayView2<'_, f64>,
    algorithm: Algorithm,
    config: &RunConfig,
    distance: &D,
    rng: &mut R,
) -> Result<RunResult>
where
    R: Rng + ?Sized,
    D: PairwiseDistance + ?Sized,
{
    config.validate()?;
    let start = init_centroids(data, config.n_clusters, config.init, rng)?;

    let fuzzy = iterate(
        data,
        Kernel::Probabilistic { m: config.m },
        start,
        config,
        distance,
    )?;
    if algorithm == Algorithm::Probabilistic {
        return Ok(fuzzy);
    }

    let distances = distance.pairwise(data, fuzzy.centers.view())?;
    let eta = possibilistic::scales(fuzzy.memberships.view(), distances.view(), config.m);
    log::debug!("possibilistic scales fixed at {eta}");
    let kernel = Kernel::Possibilistic {
        m: config.m,
        eta: eta.clone(),
    };

    let remaining = config.max_iter.saturating_sub(fuzzy.n_iter);
    if remaining == 0 {
        return settle(data, kernel, fuzzy.centers, fuzzy.n_iter, fuzzy.termination, distance);
    }

    let budget = RunConfig {
        max_iter: remaining,
        ..config.clone()
    };
    let typical = iterate(data, kernel, fuzzy.centers.clone(), &budget, distance)?;
    let n_iter = fuzzy.n_iter + typical.n_iter;

    if let Some((a, b)) = coincident_pair(&typical.centers, &eta) {
        log::debug!("possibilistic centers {a} and {b} coincide, keeping the fuzzy centers");
        return settle(data, typical.kernel, fuzzy.centers, n_iter, typical.termination, distance);
    }

    Ok(RunResult { n_iter, ..typical })
}

/// First pair of centers closer than `√(COINCIDENT · η)` of the pair's smaller scale.
fn coincident_pair(centers: &Array2<f64>, eta: &Array1<f64>) -> Option<(usize, usize)> {
    let k = centers.nrows();
    (0..k)
        .flat_map(|a| (a + 1..k).map(move |b| (a, b)))
        .find(|&(a, b)| {
            let separation = squared_distance(&centers.row(a), &centers.row(b));
            separation < COINCIDENT * eta[a].min(eta[b])
        })
}

/// Evaluate `kernel` at fixed `centers` without moving them.
fn settle<D>(
    data: ArrayView2<'_, f64>,
    kernel: Kernel,
    centers: Array2<f64>,
    n_iter: usize,
    termination: Termination,
    distance: &D,
) -> Result<RunResult>
where
    D: PairwiseDistance + ?Sized,
{
    let distances = distance.pairwise(data, centers.view())?;
    let memberships = kernel.update_memberships(distances.view());
    let inertia = kernel.objective(memberships.view(), distances.view());

    Ok(RunResult {
        memberships,
        centers,
        n_iter,
        inertia,
        termination,
        kernel,
    })
}

/// The *Iterating* state: alternate updates from `centers` until termination.
pub fn iterate<D>(
    data: ArrayView2<'_, f64>,
    kernel: Kernel,
    mut centers: Array2<f64>,
    config: &RunConfig,
    distance: &D,
) -> Result<RunResult>
where
    D: PairwiseDistance + ?Sized,
{
    let mut n_iter = 0;

    let (memberships, termination) = loop {
        let distances = distance.pairwise(data, centers.view())?;
        let memberships = kernel.update_memberships(distances.view());
        let updated = kernel.update_centers(data, memberships.view(), centers.view());

        let shift = center_shift(&centers, &updated);
        centers = updated;
        n_iter += 1;
        log::trace!(
            "{} iteration {n_iter}: center shift {shift:.3e}",
            kernel.algorithm()
        );

        if shift < config.tol {
            break (memberships, Termination::Converged);
        }
        if n_iter >= config.max_iter {
            break (memberships, Termination::MaxIterReached);
        }
    };

    let distances = distance.pairwise(data, centers.view())?;
    let inertia = kernel.objective(memberships.view(), distances.view());
    log::debug!(
        "{} run ended ({termination:?}) after {n_iter} iterations, inertia {inertia:.6}",
        kernel.algorithm()
    );

    Ok(RunResult {
        memberships,
        centers,
        n_iter,
        inertia,
        termination,
        kernel,
    })
}

fn center_shift(old: &Array2<f64>, new: &Array2<f64>) -> f64 {
    Zip::from(old)
        .and(new)
        .fold(0.0, |acc, &a, &b| acc + (a - b).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::SquaredEuclidean;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_groups() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [8.0, 8.0],
            [8.1, 7.9],
            [7.8, 8.2],
        ]
    }

    fn config(k: usize) -> RunConfig {
        RunConfig {
            n_clusters: k,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_probabilistic_shapes() {
        let x = two_groups();
        let mut rng = StdRng::seed_from_u64(1);
        let r = run_single(x.view(), Algorithm::Probabilistic, &config(2), &SquaredEuclidean, &mut rng)
            .unwrap();

        assert_eq!(r.memberships.dim(), (6, 2));
        assert_eq!(r.centers.dim(), (2, 2));
        assert!(r.inertia > 0.0);
        assert!(r.n_iter >= 1);
        assert_eq!(r.termination, Termination::Converged);
    }

    #[test]
    fn test_possibilistic_shapes_and_scales() {
        let x = two_groups();
        let mut rng = StdRng::seed_from_u64(1);
        let r = run_single(x.view(), Algorithm::Possibilistic, &config(2), &SquaredEuclidean, &mut rng)
            .unwrap();

        assert_eq!(r.memberships.dim(), (6, 2));
        assert_eq!(r.centers.dim(), (2, 2));
        let eta = r.kernel.scales().unwrap();
        assert_eq!(eta.len(), 2);
        assert!(eta.iter().all(|&e| e > 0.0 && e.is_finite()));
    }

    #[test]
    fn test_budget_exhaustion() {
        let x = two_groups();
        let cfg = RunConfig {
            n_clusters: 2,
            max_iter: 1,
            tol: 0.0,
            ..RunConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let r = run_single(x.view(), Algorithm::Probabilistic, &cfg, &SquaredEuclidean, &mut rng)
            .unwrap();
        assert_eq!(r.n_iter, 1);
        assert_eq!(r.termination, Termination::MaxIterReached);
    }

    #[test]
    fn test_centers_separate_groups() {
        let x = two_groups();
        let cfg = RunConfig {
            init: Init::KmeansPlusPlus,
            ..config(2)
        };
        let mut rng = StdRng::seed_from_u64(11);
        let r = run_single(x.view(), Algorithm::Probabilistic, &cfg, &SquaredEuclidean, &mut rng)
            .unwrap();
        let mut firsts: Vec<f64> = r.centers.column(0).to_vec();
        firsts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!(firsts[0] < 1.0);
        assert!(firsts[1] > 7.0);
    }

    #[test]
    fn test_zero_max_iter_rejected() {
        let x = two_groups();
        let cfg = RunConfig {
            n_clusters: 2,
            max_iter: 0,
            ..RunConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let err = run_single(x.view(), Algorithm::Probabilistic, &cfg, &SquaredEuclidean, &mut rng)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of iterations should be a positive number, got 0 instead."
        );
    }

    #[test]
    fn test_bad_fuzziness_rejected() {
        for m in [1.0, 0.5, f64::NAN] {
            let cfg = RunConfig { m, ..RunConfig::default() };
            assert!(matches!(
                cfg.validate(),
                Err(Error::InvalidConfiguration { name: "m", .. })
            ));
        }
    }

    /// A broad group of 25 points and a sparse group of 5, four units apart.
    /// Typicality tails are wide enough that both possibilistic centers drift
    /// onto the broad group.
    fn broad_and_sparse() -> Array2<f64> {
        let mut rows = Vec::new();
        for x in -2i32..=2 {
            for y in -2i32..=2 {
                rows.push([
                    0.5 * x as f64 + 0.07 * (3 * x + 5 * y).rem_euclid(4) as f64,
                    0.5 * y as f64 + 0.05 * (7 * x + y).rem_euclid(3) as f64,
                ]);
            }
        }
        rows.extend([[4.0, 0.0], [5.0, 0.2], [3.0, -0.1], [4.1, 1.0], [3.8, -1.0]]);
        Array2::from(rows)
    }

    #[test]
    fn test_coincident_pair() {
        let eta = array![1.0, 1.0, 4.0];
        let apart = array![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]];
        assert_eq!(coincident_pair(&apart, &eta), None);

        let near = array![[0.0, 0.0], [3.0, 0.0], [3.6, 0.0]];
        assert_eq!(coincident_pair(&near, &eta), None);
        let merged = array![[0.0, 0.0], [3.0, 0.0], [3.4, 0.0]];
        assert_eq!(coincident_pair(&merged, &eta), Some((1, 2)));
    }

    #[test]
    fn test_possibilistic_keeps_every_group() {
        let x = broad_and_sparse();
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = run_single(x.view(), Algorithm::Possibilistic, &config(2), &SquaredEuclidean, &mut rng)
                .unwrap();
            let eta = r.kernel.scales().unwrap();
            assert_eq!(coincident_pair(&r.centers, eta), None, "seed {seed}: {}", r.centers);

            let labels = crate::cluster::labels_from_memberships(r.memberships.view());
            assert!(labels[..25].iter().all(|&l| l == labels[0]), "seed {seed}: {labels:?}");
            assert!(labels[25..].iter().all(|&l| l == labels[25]), "seed {seed}: {labels:?}");
            assert_ne!(labels[0], labels[25]);
        }
    }

    #[test]
    fn test_possibilistic_shares_budget() {
        let x = broad_and_sparse();
        for max_iter in [1, 2, 5, 12, 40] {
            let cfg = RunConfig {
                max_iter,
                ..config(2)
            };
            let mut rng = StdRng::seed_from_u64(3);
            let r = run_single(x.view(), Algorithm::Possibilistic, &cfg, &SquaredEuclidean, &mut rng)
                .unwrap();
            assert!(r.n_iter <= max_iter, "{} > {max_iter}", r.n_iter);
        }

        // The fuzzy stage used the whole budget: centers are the fuzzy ones.
        let cfg = RunConfig {
            max_iter: 1,
            tol: 0.0,
            ..config(2)
        };
        let fuzzy = run_single(
            x.view(),
            Algorithm::Probabilistic,
            &cfg,
            &SquaredEuclidean,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        let typical = run_single(
            x.view(),
            Algorithm::Possibilistic,
            &cfg,
            &SquaredEuclidean,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        assert_eq!(typical.n_iter, 1);
        assert_eq!(typical.termination, Termination::MaxIterReached);
        assert_eq!(typical.centers, fuzzy.centers);
        assert!(typical.kernel.scales().is_some());
    }

    #[test]
    fn test_identical_points() {
        // Every distance hits zero; memberships and centers stay finite.
        let x = Array2::from_elem((5, 3), 2.5);
        let mut rng = StdRng::seed_from_u64(0);
        for algorithm in [Algorithm::Probabilistic, Algorithm::Possibilistic] {
            let r = run_single(x.view(), algorithm, &config(2), &SquaredEuclidean, &mut rng).unwrap();
            assert!(r.memberships.iter().all(|v| v.is_finite()));
            assert!(r.centers.iter().all(|&v| v == 2.5));
            assert_eq!(r.inertia, 0.0);
        }
    }
}
