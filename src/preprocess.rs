//! Column centering and scaling with an exact undo.
//!
//! Centering the data before clustering keeps the arithmetic well conditioned
//! when features carry a large common offset. The estimator fits in the
//! shifted frame and maps centers back, so callers never see the shift.
//!
//! When a caller asks for an in-place fit (`copy_x = false`), the same
//! [`Standardizer`] shifts their matrix, and shifts it back once fitting is
//! done. The round trip is exact up to floating-point rounding.

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Per-column offset and scale recorded from a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Standardizer {
    /// Record column means (when `center`) and standard deviations (when `scale`).
    ///
    /// Constant columns get a scale of 1 so they are left as they are.
    pub fn fit(data: ArrayView2<'_, f64>, center: bool, scale: bool) -> Result<Self> {
        let d = data.ncols();
        if data.nrows() == 0 {
            return Err(Error::EmptyInput);
        }

        let mean = if center {
            data.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?
        } else {
            Array1::zeros(d)
        };
        let scale = if scale {
            data.std_axis(Axis(0), 0.0)
                .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 })
        } else {
            Array1::ones(d)
        };

        Ok(Self { mean, scale })
    }

    /// Column offsets.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Column scales.
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    fn check(&self, ncols: usize) -> Result<()> {
        if ncols != self.mean.len() {
            return Err(Error::DimensionMismatch {
                expected: self.mean.len(),
                found: ncols,
            });
        }
        Ok(())
    }

    /// `(x - mean) / scale`, row by row, in place.
    pub fn transform_in_place(&self, data: &mut Array2<f64>) -> Result<()> {
        self.check(data.ncols())?;
        *data -= &self.mean;
        *data /= &self.scale;
        Ok(())
    }

    /// Transformed copy of `data`.
    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let mut out = data.to_owned();
        self.transform_in_place(&mut out)?;
        Ok(out)
    }

    /// `x * scale + mean`, in place.
    pub fn inverse_transform_in_place(&self, data: &mut Array2<f64>) -> Result<()> {
        self.check(data.ncols())?;
        *data *= &self.scale;
        *data += &self.mean;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_centering_only() {
        let x = array![[1.0, 10.0], [3.0, 30.0]];
        let s = Standardizer::fit(x.view(), true, false).unwrap();
        let t = s.transform(x.view()).unwrap();
        assert_eq!(t, array![[-1.0, -10.0], [1.0, 10.0]]);
    }

    #[test]
    fn test_scaling_constant_column() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let s = Standardizer::fit(x.view(), true, true).unwrap();
        assert_eq!(s.scale(), &array![1.0, 1.0]);
        let t = s.transform(x.view()).unwrap();
        assert_eq!(t, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_round_trip_in_place() {
        let original = array![[0.3, -7.5, 1e3], [2.2, 4.0, -1e3], [9.9, 0.1, 0.0]];
        let mut x = original.clone();
        let s = Standardizer::fit(x.view(), true, true).unwrap();
        s.transform_in_place(&mut x).unwrap();
        assert!(x.mean_axis(Axis(0)).unwrap().iter().all(|m| m.abs() < 1e-9));
        s.inverse_transform_in_place(&mut x).unwrap();
        for (a, b) in x.iter().zip(original.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_width_checked() {
        let s = Standardizer::fit(array![[1.0, 2.0], [3.0, 4.0]].view(), true, false).unwrap();
        let mut x = Array2::zeros((1, 3));
        assert!(matches!(
            s.transform_in_place(&mut x),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_empty_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        assert_eq!(Standardizer::fit(x.view(), true, false).unwrap_err(), Error::EmptyInput);
    }
}
