use crate::stats::fiterror::{FitError, FitResult};

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use std::fmt;

/// Singular values below this are treated as zero.
const SVD_EPS: f64 = 1e-12;

/// Multiple linear regression, `y = intercept + Σ weights[j] * x[j]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinReg {
    pub intercept: f64,
    pub weights: Vec<f64>,
}

impl fmt::Display for LinReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinReg")
    }
}

impl LinReg {
    /// Predict one value per row of `x`.
    pub fn predict(&self, x: &DMatrix<f64>) -> FitResult<DVector<f64>> {
        if x.ncols() != self.weights.len() {
            return Err(FitError::ColumnMismatch { expected: self.weights.len(), got: x.ncols() });
        }
        let w = DVector::from_column_slice(&self.weights);
        Ok((x * w).add_scalar(self.intercept))
    }

    /// Ordinary least squares with an unpenalised intercept.
    ///
    /// Features and target are centred first so the intercept drops out of the
    /// system, then the centred problem `X w = y` is solved through the SVD of
    /// `X`. Collinear or constant columns get the minimum-norm solution.
    pub fn train(x: &DMatrix<f64>, y: &DVector<f64>) -> FitResult<Self> {
        let (n, m) = x.shape();
        if n != y.len() {
            return Err(FitError::LengthMismatch { len_x: n, len_y: y.len() });
        }
        if n == 0 {
            return Err(FitError::NotEnoughPoints { len: n, needed: 1 });
        }

        let x_mean = DVector::from_iterator(m, x.column_iter().map(|col| col.mean()));
        let y_mean = y.mean();

        let mut xc = x.clone();
        for (j, mut col) in xc.column_iter_mut().enumerate() {
            col.add_scalar_mut(-x_mean[j]);
        }
        let yc = y.add_scalar(-y_mean);

        let weights = xc.svd(true, true).solve(&yc, SVD_EPS).map_err(FitError::Solver)?;

        if weights.iter().any(|w| !w.is_finite()) {
            return Err(FitError::NonFiniteWeights);
        }

        let intercept = y_mean - x_mean.dot(&weights);

        Ok(Self { intercept, weights: weights.iter().copied().collect() })
    }
}
