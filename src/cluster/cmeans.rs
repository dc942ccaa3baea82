//! The c-means estimator: configuration, restarts, and the fitted model.
//!
//! # Restarts
//!
//! A single run only finds a local optimum. [`CMeans::fit`] performs
//! `n_init` independent runs and keeps the one with the lowest inertia; on a
//! tie the earlier restart wins.
//!
//! Restart `r` seeds its own `StdRng` with a value mixed from the base seed and
//! `r` alone, so the outcome does not depend on which restart runs first. With
//! the `parallel` feature restarts run on the rayon pool and are reduced in
//! restart order, giving bit-identical results to the sequential path.

use super::init::Init;
use super::kernel::{Algorithm, Kernel};
use super::labels::labels_from_memberships;
use super::run::{run_single, RunConfig, RunResult, Termination};
use super::traits::{Clustering, SoftClustering};
use crate::distance::{PairwiseDistance, SquaredEuclidean};
use crate::error::{Error, Result};
use crate::preprocess::Standardizer;
use ndarray::{Array1, Array2, ArrayView2};
use rand::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fuzzy / possibilistic c-means clustering.
///
/// ```rust
/// use cmeans::{Algorithm, CMeans};
/// use ndarray::array;
///
/// let x = array![[0.0, 0.0], [0.1, 0.2], [9.0, 9.0], [9.1, 8.8]];
/// let fit = CMeans::new(2)
///     .with_algorithm(Algorithm::Probabilistic)
///     .with_seed(42)
///     .fit(x.view())
///     .unwrap();
///
/// let labels = fit.labels();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct CMeans {
    /// Number of clusters.
    n_clusters: usize,
    /// Update rules to apply.
    algorithm: Algorithm,
    /// Fuzziness exponent.
    m: f64,
    /// Number of restarts.
    n_init: usize,
    /// Iteration budget per run.
    max_iter: usize,
    /// Convergence tolerance on the squared center shift.
    tol: f64,
    /// Initial center strategy.
    init: Init,
    /// Base random seed.
    seed: Option<u64>,
    /// Subtract column means before fitting.
    center: bool,
    /// Divide by column standard deviations before fitting.
    scale: bool,
    /// Work on a copy in [`CMeans::fit_in_place`].
    copy_x: bool,
}

impl CMeans {
    /// Create a new estimator with `n_clusters` clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            algorithm: Algorithm::Probabilistic,
            m: 2.0,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            init: Init::Random,
            seed: None,
            center: true,
            scale: false,
            copy_x: true,
        }
    }

    /// Set the variant.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the fuzziness exponent (must be > 1).
    pub fn with_fuzziness(mut self, m: f64) -> Self {
        self.m = m;
        self
    }

    /// Set the number of restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the initialization strategy.
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Toggle mean-centering of the input.
    pub fn with_centering(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Toggle unit-variance scaling of the input.
    pub fn with_scaling(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    /// Whether [`CMeans::fit_in_place`] may modify (and then restore) its input.
    pub fn with_copy_x(mut self, copy_x: bool) -> Self {
        self.copy_x = copy_x;
        self
    }

    /// Selected variant.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn run_config(&self) -> RunConfig {
        RunConfig {
            n_clusters: self.n_clusters,
            m: self.m,
            max_iter: self.max_iter,
            tol: self.tol,
            init: self.init,
        }
    }

    /// Check the configuration without touching any data.
    pub fn validate(&self) -> Result<()> {
        if self.n_init == 0 {
            return Err(Error::config(
                "n_init",
                format!(
                    "Number of initializations should be a positive number, got {} instead.",
                    self.n_init
                ),
            ));
        }
        self.run_config().validate()
    }

    fn check_data(&self, data: ArrayView2<'_, f64>) -> Result<()> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_clusters == 0 || self.n_clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: n,
            });
        }
        Ok(())
    }

    /// Fit on a private copy of `data`.
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<CMeansFit> {
        self.fit_with(data, &SquaredEuclidean)
    }

    /// [`CMeans::fit`] with a caller-supplied distance routine.
    pub fn fit_with<D>(&self, data: ArrayView2<'_, f64>, distance: &D) -> Result<CMeansFit>
    where
        D: PairwiseDistance + ?Sized,
    {
        self.validate()?;
        self.check_data(data)?;

        let standardizer = Standardizer::fit(data, self.center, self.scale)?;
        let x = standardizer.transform(data)?;
        self.fit_prepared(x.view(), standardizer, distance)
    }

    /// Fit, honouring `copy_x`.
    ///
    /// With `copy_x = false` the centering/scaling is applied to `data` itself
    /// and undone before returning, whether or not the fit succeeded. The
    /// caller's values come back equal up to floating-point rounding.
    pub fn fit_in_place(&self, data: &mut Array2<f64>) -> Result<CMeansFit> {
        if self.copy_x {
            return self.fit(data.view());
        }
        self.validate()?;
        self.check_data(data.view())?;

        let standardizer = Standardizer::fit(data.view(), self.center, self.scale)?;
        standardizer.transform_in_place(data)?;
        let fitted = self.fit_prepared(data.view(), standardizer.clone(), &SquaredEuclidean);
        standardizer.inverse_transform_in_place(data)?;
        fitted
    }

    fn fit_prepared<D>(
        &self,
        x: ArrayView2<'_, f64>,
        standardizer: Standardizer,
        distance: &D,
    ) -> Result<CMeansFit>
    where
        D: PairwiseDistance + ?Sized,
    {
        let base = self.seed.unwrap_or_else(|| rand::rng().random());
        let config = self.run_config();

        let restart = |r: usize| -> Result<RunResult> {
            let mut rng = StdRng::seed_from_u64(restart_seed(base, r));
            let result = run_single(x, self.algorithm, &config, distance, &mut rng)?;
            log::debug!(
                "restart {}/{}: inertia {:.6} after {} iterations",
                r + 1,
                self.n_init,
                result.inertia,
                result.n_iter
            );
            Ok(result)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<Result<RunResult>> = (0..self.n_init).into_par_iter().map(restart).collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<RunResult>> = (0..self.n_init).map(restart).collect();

        let best = results
            .into_iter()
            .enumerate()
            .try_fold(None, |best: Option<Best>, (restart, result)| {
                let candidate = Best {
                    restart,
                    result: result?,
                };
                Ok::<_, Error>(Some(match best {
                    Some(incumbent) if !candidate.improves_on(&incumbent) => incumbent,
                    _ => candidate,
                }))
            })?
            .ok_or(Error::EmptyInput)?;

        log::debug!(
            "{} c-means: kept restart {} with inertia {:.6}",
            self.algorithm,
            best.restart + 1,
            best.result.inertia
        );
        CMeansFit::new(best.result, standardizer)
    }
}

impl Default for CMeans {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Best restart seen so far.
struct Best {
    restart: usize,
    result: RunResult,
}

impl Best {
    /// Strictly lower inertia wins, so earlier restarts keep ties.
    fn improves_on(&self, incumbent: &Best) -> bool {
        let (a, b) = (self.result.inertia, incumbent.result.inertia);
        a < b || (b.is_nan() && !a.is_nan())
    }
}

/// Seed of restart `r`: a SplitMix64 step over `base + r·φ`.
pub(crate) fn restart_seed(base: u64, restart: usize) -> u64 {
    let mut z = base.wrapping_add((restart as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A fitted c-means model.
#[derive(Debug, Clone)]
pub struct CMeansFit {
    /// Centers in the caller's coordinates.
    centers: Array2<f64>,
    /// Centers in the standardized frame the kernel works in.
    fitted_centers: Array2<f64>,
    memberships: Array2<f64>,
    labels: Vec<usize>,
    inertia: f64,
    n_iter: usize,
    termination: Termination,
    kernel: Kernel,
    standardizer: Standardizer,
}

impl CMeansFit {
    fn new(result: RunResult, standardizer: Standardizer) -> Result<Self> {
        let mut centers = result.centers.clone();
        standardizer.inverse_transform_in_place(&mut centers)?;
        let labels = labels_from_memberships(result.memberships.view());

        Ok(Self {
            centers,
            fitted_centers: result.centers,
            memberships: result.memberships,
            labels,
            inertia: result.inertia,
            n_iter: result.n_iter,
            termination: result.termination,
            kernel: result.kernel,
            standardizer,
        })
    }

    /// K×D cluster centers.
    pub fn centers(&self) -> &Array2<f64> {
        &self.centers
    }

    /// N×K memberships of the training points.
    pub fn memberships(&self) -> &Array2<f64> {
        &self.memberships
    }

    /// Hard label of each training point.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Objective of the winning restart.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Iterations used by the winning restart.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// How the winning restart ended.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Variant that produced this model.
    pub fn algorithm(&self) -> Algorithm {
        self.kernel.algorithm()
    }

    /// Per-cluster typicality scales, for possibilistic models.
    pub fn scales(&self) -> Option<&Array1<f64>> {
        self.kernel.scales()
    }

    /// Memberships of new points against the fitted centers.
    pub fn predict_memberships(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let x = self.standardizer.transform(data)?;
        let distances = SquaredEuclidean.pairwise(x.view(), self.fitted_centers.view())?;
        Ok(self.kernel.update_memberships(distances.view()))
    }

    /// Hard labels of new points.
    pub fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let u = self.predict_memberships(data)?;
        Ok(labels_from_memberships(u.view()))
    }
}

pub(crate) fn to_array(data: &[Vec<f32>]) -> Result<Array2<f64>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let n = data.len();
    let d = data[0].len();
    let mut flat: Vec<f64> = Vec::with_capacity(n * d);
    for point in data {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        flat.extend(point.iter().map(|&v| v as f64));
    }

    Array2::from_shape_vec((n, d), flat).map_err(|e| Error::ShapeMismatch {
        expected: format!("({n}, {d})"),
        actual: e.to_string(),
    })
}

impl Clustering for CMeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let x = to_array(data)?;
        Ok(self.fit(x.view())?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

impl SoftClustering for CMeans {
    fn fit_predict_proba(&self, data: &[Vec<f32>]) -> Result<Vec<Vec<f64>>> {
        let x = to_array(data)?;
        let fit = self.fit(x.view())?;
        Ok(fit.memberships.rows().into_iter().map(|r| r.to_vec()).collect())
    }
}
