use nalgebra::{DMatrix, DVector};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("dataset unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("target column '{0}' not found in header")]
    MissingTarget(String),
    #[error("row {row}, column '{column}': cannot parse '{value}' as a finite number")]
    Parse { row: usize, column: String, value: String },
    #[error("duplicate feature name: {0}")]
    DuplicateFeature(String),
    #[error("empty column name at position {0}")]
    EmptyName(usize),
    #[error("dataset has no {0}")]
    Empty(&'static str),
    #[error("shape mismatch: {0}")]
    Shape(String),
}

/// Fixed table of samples: one row per sample, one named column per feature
/// and a separate target column.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: DMatrix<f64>,
    target: DVector<f64>,
    feature_names: Vec<String>,
    target_name: String,
}

pub fn mk_rdr<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

impl Dataset {
    pub fn from_parts(
        features: DMatrix<f64>,
        target: DVector<f64>,
        feature_names: Vec<String>,
        target_name: &str,
    ) -> Result<Self, DatasetError> {
        if features.nrows() == 0 {
            return Err(DatasetError::Empty("rows"));
        }
        if features.ncols() == 0 {
            return Err(DatasetError::Empty("feature columns"));
        }
        if features.nrows() != target.len() {
            return Err(DatasetError::Shape(format!(
                "{} feature rows but {} target values",
                features.nrows(),
                target.len()
            )));
        }
        if features.ncols() != feature_names.len() {
            return Err(DatasetError::Shape(format!(
                "{} feature columns but {} feature names",
                features.ncols(),
                feature_names.len()
            )));
        }

        let mut seen = HashSet::new();
        for (i, name) in feature_names.iter().enumerate() {
            if name.is_empty() {
                return Err(DatasetError::EmptyName(i));
            }
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::DuplicateFeature(name.clone()));
            }
        }

        Ok(Self { features, target, feature_names, target_name: target_name.to_owned() })
    }

    /// Load a CSV file with a header row. `target` names the target column
    /// (matched case-insensitively), every other column is a feature.
    pub fn load_csv<P: AsRef<Path>>(path: P, target: &str) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| DatasetError::Unavailable { path: path.to_path_buf(), source })?;
        let dataset = Self::from_reader(file, target)?;
        log::info!(
            "Loaded {} rows x {} features from {}",
            dataset.n_samples(),
            dataset.n_features(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R, target: &str) -> Result<Self, DatasetError> {
        let mut rdr = mk_rdr(reader);
        let header: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

        let target_idx = header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(target))
            .ok_or_else(|| DatasetError::MissingTarget(target.to_owned()))?;

        let feature_names: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(_, h)| h.clone())
            .collect();

        let mut values: Vec<f64> = Vec::new();
        let mut target_values: Vec<f64> = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            for (col, field) in record.iter().enumerate() {
                let v = field.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                    DatasetError::Parse {
                        row: row + 1,
                        column: header[col].clone(),
                        value: field.to_owned(),
                    }
                })?;
                if col == target_idx {
                    target_values.push(v);
                } else {
                    values.push(v);
                }
            }
        }

        let n = target_values.len();
        let m = feature_names.len();
        if n == 0 {
            return Err(DatasetError::Empty("rows"));
        }

        let features = DMatrix::from_row_slice(n, m, &values);
        let target_name = header[target_idx].clone();
        Self::from_parts(features, DVector::from_vec(target_values), feature_names, &target_name)
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> &DMatrix<f64> {
        &self.features
    }

    pub fn target(&self) -> &DVector<f64> {
        &self.target
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        self.features.column(j).iter().copied().collect()
    }

    pub fn target_values(&self) -> Vec<f64> {
        self.target.iter().copied().collect()
    }

    /// New dataset holding the given rows, in the given order.
    ///
    /// Panics if an index is out of range.
    pub fn select_rows(&self, rows: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(rows.iter()),
            target: self.target.select_rows(rows.iter()),
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
CRIM,RM,MEDV
0.1,6.5,24.0
0.2,6.4,21.6
0.3,7.1,34.7
";

    #[test]
    fn test_from_reader_shape() {
        let ds = Dataset::from_reader(SMALL.as_bytes(), "MEDV").unwrap();

        assert_eq!(ds.n_samples(), 3);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.feature_names(), &["CRIM".to_string(), "RM".to_string()]);
        assert_eq!(ds.target().len(), ds.n_samples());
        assert_eq!(ds.target_name(), "MEDV");
        assert_eq!(ds.column(1), vec![6.5, 6.4, 7.1]);
        assert_eq!(ds.target_values(), vec![24.0, 21.6, 34.7]);
    }

    #[test]
    fn test_target_case_insensitive_and_not_last() {
        let csv = "medv,crim\n1.0,2.0\n3.0,4.0\n";
        let ds = Dataset::from_reader(csv.as_bytes(), "MEDV").unwrap();

        assert_eq!(ds.feature_names(), &["crim".to_string()]);
        assert_eq!(ds.target_values(), vec![1.0, 3.0]);
        assert_eq!(ds.column(0), vec![2.0, 4.0]);
    }

    #[test]
    fn test_missing_target() {
        let err = Dataset::from_reader(SMALL.as_bytes(), "PRICE").unwrap_err();

        assert!(matches!(err, DatasetError::MissingTarget(ref t) if t == "PRICE"));
    }

    #[test]
    fn test_unparsable_cell() {
        let csv = "A,B,MEDV\n1,2,3\n4,NA,6\n";
        let err = Dataset::from_reader(csv.as_bytes(), "MEDV").unwrap_err();

        match err {
            DatasetError::Parse { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "B");
                assert_eq!(value, "NA");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_feature() {
        let csv = "A,A,MEDV\n1,2,3\n";
        let err = Dataset::from_reader(csv.as_bytes(), "MEDV").unwrap_err();

        assert!(matches!(err, DatasetError::DuplicateFeature(ref n) if n == "A"));
    }

    #[test]
    fn test_no_rows() {
        let csv = "A,MEDV\n";
        let err = Dataset::from_reader(csv.as_bytes(), "MEDV").unwrap_err();

        assert!(matches!(err, DatasetError::Empty("rows")));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "A,B,MEDV\n1,2,3\n4,5\n";
        let err = Dataset::from_reader(csv.as_bytes(), "MEDV").unwrap_err();

        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::load_csv("does/not/exist.csv", "MEDV").unwrap_err();

        assert!(matches!(err, DatasetError::Unavailable { .. }));
    }

    #[test]
    fn test_from_parts_validates() {
        let x = DMatrix::from_row_slice(2, 2, &[1., 2., 3., 4.]);
        let y = DVector::from_column_slice(&[1., 2., 3.]);
        let names = vec!["a".to_string(), "b".to_string()];

        assert!(matches!(
            Dataset::from_parts(x.clone(), y, names, "y"),
            Err(DatasetError::Shape(_))
        ));
        let y = DVector::from_column_slice(&[1., 2.]);
        assert!(matches!(
            Dataset::from_parts(x, y, vec!["a".into(), "".into()], "y"),
            Err(DatasetError::EmptyName(1))
        ));
    }

    #[test]
    fn test_select_rows() {
        let ds = Dataset::from_reader(SMALL.as_bytes(), "MEDV").unwrap();
        let sub = ds.select_rows(&[2, 0]);

        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.column(0), vec![0.3, 0.1]);
        assert_eq!(sub.target_values(), vec![34.7, 24.0]);
        assert_eq!(sub.feature_names(), ds.feature_names());
        // source untouched
        assert_eq!(ds.n_samples(), 3);
    }
}
