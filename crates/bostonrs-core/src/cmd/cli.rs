use clap::Parser;
use std::path::PathBuf;

use crate::cmd::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "bostonrs",
    about = "Describe the Boston housing data, fit a scaled linear regression and plot the fit",
    version
)]
pub struct Cli {
    /// CSV file with a header row. Not bundled: place the 506-row Boston housing
    /// table (CRIM..LSTAT plus MEDV, e.g. BostonHousing.csv) at this path
    #[arg(long = "data", value_name = "PATH", default_value = "data/boston_housing.csv")]
    pub data_path: PathBuf,

    /// Name of the target column (case-insensitive)
    #[arg(long, default_value = "MEDV")]
    pub target: String,

    /// Directory for the rendered figures
    #[arg(long = "out-dir", value_name = "DIR", default_value = "figures")]
    pub out_dir: PathBuf,

    /// Write a JSON run summary to this path
    #[arg(long = "summary", value_name = "PATH")]
    pub summary_path: Option<PathBuf>,

    /// Skip figure rendering
    #[arg(long = "no-plots")]
    pub no_plots: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            data_path: self.data_path,
            target: self.target,
            out_dir: self.out_dir,
            summary_path: self.summary_path,
            render_figures: !self.no_plots,
        }
    }
}
