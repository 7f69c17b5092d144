use crate::dataset::Dataset;
use crate::stats::percentile;

use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt::Write;

/// Row labels of the rendered describe table.
const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const CELL_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_values(name: &str, values: &[f64]) -> Self {
        Self {
            name: name.to_owned(),
            count: values.len(),
            mean: values.mean(),
            std: values.std_dev(),
            min: Statistics::min(values),
            q25: percentile(values, 0.25),
            q50: percentile(values, 0.5),
            q75: percentile(values, 0.75),
            max: Statistics::max(values),
        }
    }

    fn stat_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }
}

/// Summaries for every feature column, in order, followed by the target.
pub fn describe(ds: &Dataset) -> Vec<ColumnSummary> {
    let mut out: Vec<ColumnSummary> = ds
        .feature_names()
        .iter()
        .enumerate()
        .map(|(j, name)| ColumnSummary::from_values(name, &ds.column(j)))
        .collect();
    out.push(ColumnSummary::from_values(ds.target_name(), &ds.target_values()));
    out
}

/// Fixed-width text table: statistics as rows, at most `per_block` columns
/// side by side, further columns continue in a new block below.
pub fn format_describe(summaries: &[ColumnSummary], per_block: usize) -> String {
    let mut out = String::new();
    let per_block = per_block.max(1);

    for (b, block) in summaries.chunks(per_block).enumerate() {
        if b > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:<6}", "");
        for s in block {
            let _ = write!(out, "{:>w$}", s.name, w = CELL_WIDTH);
        }
        out.push('\n');

        let rows: Vec<[f64; 8]> = block.iter().map(ColumnSummary::stat_row).collect();
        for (i, label) in STAT_LABELS.iter().enumerate() {
            let _ = write!(out, "{:<6}", label);
            for row in &rows {
                let _ = write!(out, "{:>w$.6}", row[i], w = CELL_WIDTH);
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};

    fn toy() -> Dataset {
        let x = DMatrix::from_row_slice(4, 2, &[1., 10., 2., 20., 3., 30., 4., 40.]);
        let y = DVector::from_column_slice(&[5., 6., 7., 8.]);
        Dataset::from_parts(x, y, vec!["a".into(), "b".into()], "y").unwrap()
    }

    #[test]
    fn test_summary_values() {
        let s = ColumnSummary::from_values("a", &[1., 2., 3., 4.]);

        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        // sample std of 1..4
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.);
        assert!((s.q25 - 1.75).abs() < 1e-12);
        assert!((s.q50 - 2.5).abs() < 1e-12);
        assert!((s.q75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.);
    }

    #[test]
    fn test_single_value_std_undefined() {
        let s = ColumnSummary::from_values("a", &[3.]);

        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 3.);
        assert!(s.std.is_nan());
        assert_eq!(s.q75, 3.);
    }

    #[test]
    fn test_describe_includes_target_last() {
        let summaries = describe(&toy());

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].name, "a");
        assert_eq!(summaries[1].name, "b");
        assert_eq!(summaries[2].name, "y");
        assert!((summaries[1].mean - 25.0).abs() < 1e-12);
        assert!((summaries[2].max - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_blocks() {
        let summaries = describe(&toy());
        let table = format_describe(&summaries, 2);
        let lines: Vec<&str> = table.lines().collect();

        // two blocks of header + 8 stat rows, separated by a blank line
        assert_eq!(lines.len(), 9 + 1 + 9);
        assert!(lines[0].contains('a') && lines[0].contains('b'));
        assert!(lines[1].starts_with("count"));
        assert!(lines[1].contains("4.000000"));
        assert!(lines[10].trim() == "y");
        assert!(lines[12].contains("6.500000"));
    }
}
