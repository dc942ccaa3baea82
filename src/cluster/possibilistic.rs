//! Possibilistic c-means update rules.
//!
//! Drops the sum-to-one constraint: a membership says how *typical* a point is
//! of one cluster, without looking at the others. An outlier far from every
//! center gets low membership everywhere; a point between two close clusters
//! may be highly typical of both.
//!
//! Each cluster carries a scale ηⱼ, its characteristic squared distance:
//!
//! ```text
//! ηⱼ  = Σᵢ uᵢⱼ^m dᵢⱼ / Σᵢ uᵢⱼ^m
//! uᵢⱼ = 1 / (1 + (dᵢⱼ / ηⱼ)^(1/(m-1)))
//! ```
//!
//! A point at distance ηⱼ from center j has membership exactly 0.5.
//! Centers use the same weighted mean as the fuzzy variant.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

/// Smallest scale a cluster may have.
///
/// Guards the division in the membership rule when every point of a cluster
/// coincides with its center.
pub const ETA_FLOOR: f64 = 1e-12;

/// Per-cluster typicality scales from memberships and squared distances.
///
/// Clusters with no weight, or whose estimate is zero or not finite, get
/// [`ETA_FLOOR`].
pub fn scales(memberships: ArrayView2<'_, f64>, distances: ArrayView2<'_, f64>, m: f64) -> Array1<f64> {
    let weights = memberships.mapv(|u| u.max(0.0).powf(m));
    let denom = weights.sum_axis(Axis(0));
    let numer = (&weights * &distances).sum_axis(Axis(0));

    Zip::from(&numer).and(&denom).map_collect(|&num, &den| {
        let eta = num / den;
        if eta.is_finite() && eta > ETA_FLOOR {
            eta
        } else {
            ETA_FLOOR
        }
    })
}

/// Membership matrix (N×K) from squared distances (N×K) and scales (K).
///
/// Entries lie in [0, 1]; `dᵢⱼ == 0` gives exactly 1.
pub fn memberships(distances: ArrayView2<'_, f64>, eta: ArrayView1<'_, f64>, m: f64) -> Array2<f64> {
    let exponent = 1.0 / (m - 1.0);
    let mut u = Array2::zeros(distances.raw_dim());

    Zip::from(u.rows_mut())
        .and(distances.rows())
        .for_each(|mut row, d| {
            Zip::from(&mut row).and(&d).and(&eta).for_each(|slot, &dij, &eta_j| {
                *slot = typicality(dij, eta_j.max(ETA_FLOOR), exponent);
            });
        });

    u
}

#[inline]
fn typicality(d: f64, eta: f64, exponent: f64) -> f64 {
    if d <= 0.0 {
        return 1.0;
    }
    let ratio = (d / eta).powf(exponent);
    if ratio.is_finite() {
        1.0 / (1.0 + ratio)
    } else {
        0.0
    }
}
