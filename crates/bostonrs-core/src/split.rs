use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum SplitError {
    InvalidFraction(f64),
    TooFewSamples { len: usize, n_train: usize, n_test: usize },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::InvalidFraction(frac) => {
                write!(f, "test fraction must be in (0, 1), got {frac}")
            },
            SplitError::TooFewSamples { len, n_train, n_test } => {
                write!(
                    f,
                    "cannot split {len} rows into {n_train} train and {n_test} test rows"
                )
            },
        }
    }
}

impl std::error::Error for SplitError {}

/// Disjoint, exhaustive partition of row indices `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shuffle `0..n` with a Fisher-Yates pass driven by `StdRng::seed_from_u64(seed)`.
/// The first `ceil(test_fraction * n)` permuted indices become the test rows,
/// the rest the train rows.
pub fn train_test_split(
    n: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }

    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(SplitError::TooFewSamples { len: n, n_train, n_test });
    }

    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let train = idx.split_off(n_test);
    log::info!("Split {n} rows into {} train / {} test (seed {seed})", train.len(), idx.len());

    Ok(TrainTestSplit { train, test: idx })
}
