//! Hard labels from soft memberships.

use ndarray::ArrayView2;

/// Index of the largest membership in each row.
///
/// Ties go to the lowest cluster index, and NaN entries never win.
///
/// ```rust
/// use cmeans::cluster::labels_from_memberships;
/// use ndarray::array;
///
/// let u = array![[0.2, 0.8], [0.5, 0.5]];
/// assert_eq!(labels_from_memberships(u.view()), vec![1, 0]);
/// ```
pub fn labels_from_memberships(memberships: ArrayView2<'_, f64>) -> Vec<usize> {
    memberships
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            let mut best_val = f64::NEG_INFINITY;
            for (j, &v) in row.iter().enumerate() {
                if v > best_val {
                    best_val = v;
                    best = j;
                }
            }
            best
        })
        .collect()
}
