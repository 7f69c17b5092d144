use crate::dataset::Dataset;
use crate::scaler::{ScaleError, StandardScaler};
use crate::split::TrainTestSplit;
use crate::stats::{FitError, LinReg};

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

pub const INTERCEPT_NAME: &str = "intercept";

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("feature '{0}' has zero variance in the training rows")]
    ZeroVariance(String),
    #[error("scaling failed: {0}")]
    Scale(ScaleError),
    #[error("least squares fit failed: {0}")]
    Fit(#[from] FitError),
    #[error("evaluation needs at least one test row")]
    EmptyEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub weight: f64,
}

/// Scaler and linear model fit together on the same training rows.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    scaler: StandardScaler,
    model: LinReg,
    feature_names: Vec<String>,
}

/// Fit on the train rows of `split`. Test rows never reach the scaler.
pub fn train(ds: &Dataset, split: &TrainTestSplit) -> Result<FittedPipeline, ModelError> {
    let train_set = ds.select_rows(&split.train);
    FittedPipeline::fit(&train_set)
}

impl FittedPipeline {
    pub fn fit(train: &Dataset) -> Result<Self, ModelError> {
        let (scaler, scaled) =
            StandardScaler::fit_transform(train.features()).map_err(|e| match e {
                ScaleError::ZeroVariance { column } => {
                    ModelError::ZeroVariance(train.feature_names()[column].clone())
                },
                other => ModelError::Scale(other),
            })?;

        let model = LinReg::train(&scaled, train.target())?;
        log::info!(
            "Fitted {} on {} rows x {} features, intercept {:.3}",
            model,
            train.n_samples(),
            train.n_features(),
            model.intercept
        );

        Ok(Self { scaler, model, feature_names: train.feature_names().to_vec() })
    }

    /// Scale `features` with the training statistics and apply the model.
    pub fn predict(&self, features: &DMatrix<f64>) -> Result<DVector<f64>, ModelError> {
        let scaled = self.scaler.transform(features).map_err(ModelError::Scale)?;
        Ok(self.model.predict(&scaled)?)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &LinReg {
        &self.model
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Weights on standardised features, then the intercept.
    pub fn coefficients(&self) -> Vec<Coefficient> {
        self.named(&self.model.weights, self.model.intercept)
    }

    /// The same model expressed on the raw feature scale:
    /// `w_j / std_j` and `b - Σ w_j * mean_j / std_j`.
    pub fn unscaled_coefficients(&self) -> Vec<Coefficient> {
        let mean = self.scaler.mean();
        let std = self.scaler.std();

        let weights: Vec<f64> =
            self.model.weights.iter().zip(std).map(|(w, s)| w / s).collect();
        let intercept =
            self.model.intercept - weights.iter().zip(mean).map(|(w, m)| w * m).sum::<f64>();

        self.named(&weights, intercept)
    }

    /// `NAME:w` strings with one decimal, intercept last.
    pub fn format_coefficients(&self) -> Vec<String> {
        self.coefficients().iter().map(|c| format!("{}:{:.1}", c.name, c.weight)).collect()
    }

    fn named(&self, weights: &[f64], intercept: f64) -> Vec<Coefficient> {
        self.feature_names
            .iter()
            .zip(weights)
            .map(|(name, &weight)| Coefficient { name: name.clone(), weight })
            .chain(std::iter::once(Coefficient {
                name: INTERCEPT_NAME.to_owned(),
                weight: intercept,
            }))
            .collect()
    }
}

/// Render as `['A:1.0', 'B:-0.3', 'intercept:22.5']`.
pub fn format_coefficient_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}
