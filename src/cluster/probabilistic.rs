//! Fuzzy (probabilistic) c-means update rules.
//!
//! Memberships of a point form a probability distribution over the clusters.
//! With Euclidean norms the classic rule reads
//!
//! ```text
//! uᵢⱼ = 1 / Σₖ (||xᵢ - cⱼ|| / ||xᵢ - cₖ||)^(2/(m-1))
//! ```
//!
//! and since the kernels are fed *squared* distances `dᵢⱼ = ||xᵢ - cⱼ||²`,
//! the same quantity is `1 / Σₖ (dᵢⱼ / dᵢₖ)^(1/(m-1))`.
//!
//! # Zero distances
//!
//! A point sitting exactly on one or more centers would divide by zero.
//! Its membership is split evenly over the zero-distance clusters instead, and
//! every other cluster gets 0, so the row still sums to exactly 1.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};

/// Membership matrix (N×K) from squared distances (N×K).
///
/// Rows sum to 1 and entries lie in [0, 1]. `m` must be greater than 1.
pub fn memberships(distances: ArrayView2<'_, f64>, m: f64) -> Array2<f64> {
    let exponent = 1.0 / (m - 1.0);
    let mut u = Array2::zeros(distances.raw_dim());

    Zip::from(u.rows_mut())
        .and(distances.rows())
        .for_each(|row, d| fill_row(row, d, exponent));

    u
}

fn fill_row(mut row: ArrayViewMut1<'_, f64>, d: ArrayView1<'_, f64>, exponent: f64) {
    let zeros = d.iter().filter(|&&v| v == 0.0).count();
    if zeros > 0 {
        let share = 1.0 / zeros as f64;
        for (slot, &v) in row.iter_mut().zip(d.iter()) {
            *slot = if v == 0.0 { share } else { 0.0 };
        }
        return;
    }

    // Ratios against the nearest center keep every weight in (0, 1], so
    // tiny distances cannot overflow to infinity.
    let nearest = d.iter().copied().fold(f64::INFINITY, f64::min);
    let mut total = 0.0;
    for (slot, &v) in row.iter_mut().zip(d.iter()) {
        let w = (nearest / v).powf(exponent);
        *slot = if w.is_finite() { w } else { 0.0 };
        total += *slot;
    }

    if total > 0.0 && total.is_finite() {
        row.mapv_inplace(|w| w / total);
    } else {
        // Every distance infinite: nothing distinguishes the clusters.
        row.fill(1.0 / row.len() as f64);
    }
}

/// Weighted-mean centers (K×D) from memberships (N×K) and data (N×D).
///
/// `cⱼ = Σᵢ uᵢⱼ^m xᵢ / Σᵢ uᵢⱼ^m`. A cluster whose weights sum to zero keeps
/// its row from `previous`.
pub fn centers(
    data: ArrayView2<'_, f64>,
    memberships: ArrayView2<'_, f64>,
    m: f64,
    previous: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let weights = memberships.mapv(|u| u.max(0.0).powf(m));
    let sums = weights.sum_axis(Axis(0));
    let mut out = weights.t().dot(&data);

    for (j, mut row) in out.rows_mut().into_iter().enumerate() {
        let denom = sums[j];
        if denom > 0.0 && denom.is_finite() {
            row.mapv_inplace(|v| v / denom);
        } else {
            row.assign(&previous.row(j));
        }
    }

    out
}

/// `Σᵢⱼ uᵢⱼ^m dᵢⱼ`, the c-means objective.
pub fn objective(memberships: ArrayView2<'_, f64>, distances: ArrayView2<'_, f64>, m: f64) -> f64 {
    Zip::from(memberships)
        .and(distances)
        .fold(0.0, |acc, &u, &d| acc + u.max(0.0).powf(m) * d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_two_clusters_closed_form() {
        // m = 2: u = (1/d_j) / Σ(1/d_k)
        let d = array![[1.0, 3.0]];
        let u = memberships(d.view(), 2.0);
        assert!((u[[0, 0]] - 0.75).abs() < 1e-12);
        assert!((u[[0, 1]] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_zero_distance_single() {
        let d = array![[0.0, 4.0, 9.0]];
        let u = memberships(d.view(), 2.0);
        assert_eq!(u, array![[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_zero_distance_shared() {
        let d = array![[0.0, 4.0, 0.0, 1.0]];
        let u = memberships(d.view(), 1.5);
        assert_eq!(u, array![[0.5, 0.0, 0.5, 0.0]]);
    }

    #[test]
    fn test_tiny_distances_do_not_overflow() {
        let d = array![[1e-300, 1e300]];
        let u = memberships(d.view(), 1.1);
        assert!(u.iter().all(|v| v.is_finite()));
        assert!((u.row(0).sum() - 1.0).abs() < 1e-12);
        assert!(u[[0, 0]] > 0.999);
    }

    #[test]
    fn test_larger_m_is_softer() {
        let d = array![[1.0, 4.0]];
        let sharp = memberships(d.view(), 1.5);
        let soft = memberships(d.view(), 4.0);
        assert!(sharp[[0, 0]] > soft[[0, 0]]);
        assert!(soft[[0, 0]] > 0.5);
    }

    #[test]
    fn test_centers_weighted_mean() {
        let x = array![[0.0, 0.0], [2.0, 2.0]];
        let u = array![[1.0, 0.5], [0.0, 0.5]];
        let prev = Array2::zeros((2, 2));
        let c = centers(x.view(), u.view(), 2.0, prev.view());

        assert_eq!(c.row(0).to_vec(), vec![0.0, 0.0]);
        // equal weights 0.25/0.25 -> midpoint
        assert!((c[[1, 0]] - 1.0).abs() < 1e-12);
        assert!((c[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_centers_keep_previous_when_empty() {
        let x = array![[1.0, 1.0], [3.0, 3.0]];
        let u = array![[1.0, 0.0], [1.0, 0.0]];
        let prev = array![[9.0, 9.0], [-5.0, 7.0]];
        let c = centers(x.view(), u.view(), 2.0, prev.view());

        assert_eq!(c.row(0).to_vec(), vec![2.0, 2.0]);
        assert_eq!(c.row(1).to_vec(), vec![-5.0, 7.0]);
    }

    #[test]
    fn test_objective() {
        let u = array![[1.0, 0.0], [0.5, 0.5]];
        let d = array![[2.0, 8.0], [4.0, 4.0]];
        // 1*2 + 0 + 0.25*4 + 0.25*4
        assert!((objective(u.view(), d.view(), 2.0) - 4.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn rows_are_distributions(
            flat in proptest::collection::vec(0.0f64..100.0, 4 * 3),
            m in 1.1f64..5.0,
        ) {
            let d = Array2::from_shape_vec((4, 3), flat).unwrap();
            let u = memberships(d.view(), m);

            prop_assert_eq!(u.dim(), (4, 3));
            for row in u.rows() {
                prop_assert!((row.sum() - 1.0).abs() < 1e-6);
                for &v in row {
                    prop_assert!(v > -1e-6 && v < 1.0 + 1e-6);
                }
            }
        }
    }
}
