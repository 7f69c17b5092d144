use std::fmt;

#[derive(Debug, PartialEq)]
pub enum FitError {
    LengthMismatch { len_x: usize, len_y: usize },
    NotEnoughPoints { len: usize, needed: usize },
    ColumnMismatch { expected: usize, got: usize },
    NonFiniteWeights,
    Solver(&'static str),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::LengthMismatch { len_x, len_y } => {
                write!(f, "x and y have different numbers of rows: {len_x} vs {len_y}")
            },
            FitError::NotEnoughPoints { len, needed } => {
                write!(f, "not enough rows: got {len}, need at least {needed}")
            },
            FitError::ColumnMismatch { expected, got } => {
                write!(f, "model expects {expected} feature columns, got {got}")
            },
            FitError::NonFiniteWeights => {
                write!(f, "least squares produced non-finite weights")
            },
            FitError::Solver(msg) => write!(f, "solver error: {msg}"),
        }
    }
}

impl std::error::Error for FitError {}

pub type FitResult<T> = Result<T, FitError>;
