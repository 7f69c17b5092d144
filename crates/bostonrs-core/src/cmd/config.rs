use crate::dataset::{Dataset, DatasetError};
use crate::describe::{describe, format_describe, ColumnSummary};
use crate::evaluator::evaluate;
use crate::plot::{
    draw_feature_scatter, draw_histograms, draw_prediction_plot, HIST_FIGURE, PREDICT_FIGURE,
    SCATTER_FIGURE,
};
use crate::split::{train_test_split, SplitError};
use crate::trainer::{format_coefficient_list, train, Coefficient, ModelError};

use serde::Serialize;
use statrs::statistics::Statistics;
use std::fs;
use std::path::PathBuf;

/* =================== Fixed run parameters =================== */

pub const SPLIT_SEED: u64 = 42;
pub const TEST_FRACTION: f64 = 0.33;
/// Columns per block in the printed describe table.
const DESCRIBE_BLOCK: usize = 6;

/* =================== Public configuration types =================== */

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub target: String,
    pub out_dir: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub render_figures: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub n_samples: usize,
    pub n_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub describe: Vec<ColumnSummary>,
    pub coefficients: Vec<Coefficient>,
    pub test_rmse: f64,
    pub test_r2: Option<f64>,
}

/* =================== Error type (no process::exit) =================== */

#[derive(thiserror::Error, Debug)]
pub enum CmdError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("split error: {0}")]
    Split(#[from] SplitError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plot error: {0}")]
    Plot(String),
}

/* =================== Entry point =================== */

impl Config {
    /// load -> describe -> plot -> split -> scale + fit -> evaluate -> plot
    pub fn run(&self) -> Result<RunSummary, CmdError> {
        let dataset = Dataset::load_csv(&self.data_path, &self.target)?;

        let summaries = describe(&dataset);
        println!("{}", format_describe(&summaries, DESCRIBE_BLOCK));

        if self.render_figures {
            fs::create_dir_all(&self.out_dir)?;
            self.draw_exploration(&dataset)?;
        }

        let split = train_test_split(dataset.n_samples(), TEST_FRACTION, SPLIT_SEED)?;
        let pipeline = train(&dataset, &split)?;
        println!("{}", format_coefficient_list(&pipeline.format_coefficients()));

        let test_set = dataset.select_rows(&split.test);
        let eval = evaluate(&pipeline, &test_set)?;
        println!("test rmse: {:.2}", eval.rmse);

        if self.render_figures {
            let y = dataset.target_values();
            let line = (Statistics::min(&y), Statistics::max(&y));
            let path = self.out_dir.join(PREDICT_FIGURE);
            draw_prediction_plot(&path, &eval.truth, &eval.predictions, line, eval.rmse)
                .map_err(|e| CmdError::Plot(format!("{}: {e}", path.display())))?;
        }

        let summary = RunSummary {
            n_samples: dataset.n_samples(),
            n_features: dataset.n_features(),
            n_train: split.train.len(),
            n_test: split.test.len(),
            seed: SPLIT_SEED,
            test_fraction: TEST_FRACTION,
            describe: summaries,
            coefficients: pipeline.coefficients(),
            test_rmse: eval.rmse,
            test_r2: eval.r2,
        };

        if let Some(path) = &self.summary_path {
            fs::write(path, serde_json::to_string_pretty(&summary)?)?;
            log::info!("Wrote run summary to {}", path.display());
        }

        Ok(summary)
    }

    fn draw_exploration(&self, dataset: &Dataset) -> Result<(), CmdError> {
        let mut columns: Vec<(String, Vec<f64>)> = dataset
            .feature_names()
            .iter()
            .enumerate()
            .map(|(j, name)| (name.clone(), dataset.column(j)))
            .collect();
        columns.push((dataset.target_name().to_owned(), dataset.target_values()));
        let borrowed: Vec<(&str, &[f64])> =
            columns.iter().map(|(n, v)| (n.as_str(), v.as_slice())).collect();

        let path = self.out_dir.join(HIST_FIGURE);
        draw_histograms(&path, &borrowed)
            .map_err(|e| CmdError::Plot(format!("{}: {e}", path.display())))?;

        let path = self.out_dir.join(SCATTER_FIGURE);
        draw_feature_scatter(&path, dataset)
            .map_err(|e| CmdError::Plot(format!("{}: {e}", path.display())))?;

        Ok(())
    }
}
