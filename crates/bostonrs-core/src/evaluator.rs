use crate::dataset::Dataset;
use crate::stats::{r2_from_predictions, rmse};
use crate::trainer::{FittedPipeline, ModelError};

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub rmse: f64,
    pub r2: Option<f64>,
    pub predictions: Vec<f64>,
    pub truth: Vec<f64>,
}

/// Predict the rows of `test` with the already fitted pipeline and score them.
pub fn evaluate(pipeline: &FittedPipeline, test: &Dataset) -> Result<Evaluation, ModelError> {
    let predictions: Vec<f64> = pipeline.predict(test.features())?.iter().copied().collect();
    let truth = test.target_values();

    if predictions.iter().any(|p| !p.is_finite()) {
        log::warn!("Non-finite prediction in test set");
    }

    let rmse = rmse(&truth, &predictions).ok_or(ModelError::EmptyEvaluation)?;
    let r2 = r2_from_predictions(&truth, &predictions);

    log::info!("Test rmse {rmse:.3}, r2 {}", r2.map_or("n/a".to_string(), |v| format!("{v:.3}")));

    Ok(Evaluation { rmse, r2, predictions, truth })
}
