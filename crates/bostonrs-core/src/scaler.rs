use nalgebra::DMatrix;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ScaleError {
    Empty,
    ZeroVariance { column: usize },
    NonFinite { column: usize },
    ColumnMismatch { expected: usize, got: usize },
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleError::Empty => write!(f, "cannot fit scaler on an empty matrix"),
            ScaleError::ZeroVariance { column } => {
                write!(f, "column {column} has zero variance")
            },
            ScaleError::NonFinite { column } => {
                write!(f, "column {column} has non-finite mean or standard deviation")
            },
            ScaleError::ColumnMismatch { expected, got } => {
                write!(f, "scaler was fit on {expected} columns, got {got}")
            },
        }
    }
}

impl std::error::Error for ScaleError {}

/// Per-column standardisation `(x - mean) / std`.
///
/// `std` is the population standard deviation (ddof = 0) of the rows the
/// scaler was fit on, so fitted columns come out with unit population std.
/// Statistics are fixed once fit; `transform` never touches them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &DMatrix<f64>) -> Result<Self, ScaleError> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ScaleError::Empty);
        }

        let mut mean = Vec::with_capacity(x.ncols());
        let mut std = Vec::with_capacity(x.ncols());

        for (j, col) in x.column_iter().enumerate() {
            let m = col.iter().mean();
            let s = col.iter().population_std_dev();
            if !m.is_finite() || !s.is_finite() {
                return Err(ScaleError::NonFinite { column: j });
            }
            if s == 0.0 {
                return Err(ScaleError::ZeroVariance { column: j });
            }
            log::debug!("column {j}: mean {m:.6}, std {s:.6}");
            mean.push(m);
            std.push(s);
        }

        Ok(Self { mean, std })
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>, ScaleError> {
        if x.ncols() != self.mean.len() {
            return Err(ScaleError::ColumnMismatch { expected: self.mean.len(), got: x.ncols() });
        }
        Ok(DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| (x[(i, j)] - self.mean[j]) / self.std[j]))
    }

    pub fn fit_transform(x: &DMatrix<f64>) -> Result<(Self, DMatrix<f64>), ScaleError> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}
