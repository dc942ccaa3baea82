//! Agreement between a clustering and reference labels.
//!
//! Used to check fitted hard labels against a known partition. All scores are
//! invariant to relabeling: `[0, 0, 1]` and `[1, 1, 0]` describe the same
//! clustering.
//!
//! | Metric | Range | Best | Asks |
//! |--------|-------|------|------|
//! | [`homogeneity`] | [0, 1] | 1 | Does each cluster hold a single class? |
//! | [`completeness`] | [0, 1] | 1 | Is each class inside a single cluster? |
//! | [`v_measure`] | [0, 1] | 1 | Harmonic mean of the two |
//! | [`ari`] | [-1, 1] | 1 | Pair agreement, corrected for chance |
//!
//! # References
//!
//! - Rosenberg & Hirschberg (2007). "V-Measure"
//! - Hubert & Arabie (1985). "Comparing partitions"

use std::collections::HashMap;

/// Pair counts of (predicted, true) labels with both marginals.
struct Contingency {
    joint: HashMap<(usize, usize), usize>,
    pred: HashMap<usize, usize>,
    truth: HashMap<usize, usize>,
    n: usize,
}

impl Contingency {
    fn new(pred: &[usize], truth: &[usize]) -> Self {
        assert_eq!(pred.len(), truth.len(), "label slices differ in length");

        let mut table = Self {
            joint: HashMap::new(),
            pred: HashMap::new(),
            truth: HashMap::new(),
            n: pred.len(),
        };
        for (&p, &t) in pred.iter().zip(truth) {
            *table.joint.entry((p, t)).or_insert(0) += 1;
            *table.pred.entry(p).or_insert(0) += 1;
            *table.truth.entry(t).or_insert(0) += 1;
        }
        table
    }

    fn entropy(counts: &HashMap<usize, usize>, n: usize) -> f64 {
        let n = n as f64;
        counts
            .values()
            .map(|&c| {
                let p = c as f64 / n;
                -p * p.ln()
            })
            .sum()
    }

    /// H(truth | pred) when `given_pred`, else H(pred | truth).
    fn conditional_entropy(&self, given_pred: bool) -> f64 {
        let n = self.n as f64;
        self.joint
            .iter()
            .map(|(&(p, t), &c)| {
                let given = if given_pred { self.pred[&p] } else { self.truth[&t] };
                -(c as f64 / n) * (c as f64 / given as f64).ln()
            })
            .sum()
    }
}

/// Homogeneity: 1 when every predicted cluster contains members of one class.
///
/// ```text
/// h = 1 - H(truth | pred) / H(truth)
/// ```
pub fn homogeneity(pred: &[usize], truth: &[usize]) -> f64 {
    let table = Contingency::new(pred, truth);
    let h_truth = Contingency::entropy(&table.truth, table.n);
    if table.n == 0 || h_truth == 0.0 {
        return 1.0;
    }
    1.0 - table.conditional_entropy(true) / h_truth
}

/// Completeness: 1 when every class lands in a single predicted cluster.
///
/// ```text
/// c = 1 - H(pred | truth) / H(pred)
/// ```
pub fn completeness(pred: &[usize], truth: &[usize]) -> f64 {
    let table = Contingency::new(pred, truth);
    let h_pred = Contingency::entropy(&table.pred, table.n);
    if table.n == 0 || h_pred == 0.0 {
        return 1.0;
    }
    1.0 - table.conditional_entropy(false) / h_pred
}

/// V-measure: harmonic mean of homogeneity and completeness.
///
/// ```rust
/// use cmeans::metrics::v_measure;
///
/// assert!((v_measure(&[1, 1, 0, 0], &[0, 0, 1, 1]) - 1.0).abs() < 1e-12);
/// assert!(v_measure(&[0, 1, 0, 1], &[0, 0, 1, 1]) < 0.1);
/// ```
pub fn v_measure(pred: &[usize], truth: &[usize]) -> f64 {
    let h = homogeneity(pred, truth);
    let c = completeness(pred, truth);
    if h + c == 0.0 {
        0.0
    } else {
        2.0 * h * c / (h + c)
    }
}

/// Adjusted Rand Index.
///
/// Fraction of point pairs on which both labelings agree, rescaled so that
/// random labelings score about 0 and identical ones score 1.
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    let table = Contingency::new(pred, truth);
    let comb2 = |c: usize| (c * c.saturating_sub(1) / 2) as f64;

    let index: f64 = table.joint.values().map(|&c| comb2(c)).sum();
    let sum_pred: f64 = table.pred.values().map(|&c| comb2(c)).sum();
    let sum_truth: f64 = table.truth.values().map(|&c| comb2(c)).sum();
    let total = comb2(table.n);
    if total == 0.0 {
        return 1.0;
    }

    let expected = sum_pred * sum_truth / total;
    let max_index = (sum_pred + sum_truth) / 2.0;
    if max_index == expected {
        return 1.0;
    }
    (index - expected) / (max_index - expected)
}
