//! Read/write the fitted grade predictor as JSON.
//!
//! The file is the portable representation of a trained model: coefficients,
//! intercept, the training report and when it was fitted.

use std::fs::{File, create_dir_all};
use std::path::Path;

use crate::error::AppError;
use crate::predict::{GradePredictor, LinearModel, WINDOW};

/// Write a model JSON file, creating parent directories as needed.
pub fn write_model_json(path: &Path, model: &LinearModel) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create model dir '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<LinearModel, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let model: LinearModel =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    if model.coefficients.len() != WINDOW {
        return Err(AppError::new(
            2,
            format!(
                "Invalid model JSON: expected {WINDOW} coefficients, found {}",
                model.coefficients.len()
            ),
        ));
    }
    Ok(model)
}

/// Load the predictor saved at `path`, or an untrained one if nothing is saved yet.
pub fn load_predictor(path: &Path) -> Result<GradePredictor, AppError> {
    if !path.exists() {
        return Ok(GradePredictor::untrained());
    }
    Ok(GradePredictor::from_model(read_model_json(path)?))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::predict::TrainReport;

    #[test]
    fn model_round_trips_through_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("models").join("m.json");
        let model = LinearModel {
            intercept: 1.5,
            coefficients: vec![0.1, 0.2, 0.7],
            report: TrainReport { r2: Some(0.8), n_train: 8, n_test: 2 },
            trained_at: Utc::now(),
        };

        write_model_json(&path, &model).unwrap();
        assert_eq!(read_model_json(&path).unwrap(), model);
        assert!(load_predictor(&path).unwrap().is_trained());
        assert!(!load_predictor(&tmp.path().join("missing.json")).unwrap().is_trained());
    }

    #[test]
    fn wrong_coefficient_count_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("m.json");
        let model = LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0],
            report: TrainReport { r2: None, n_train: 1, n_test: 1 },
            trained_at: Utc::now(),
        };
        write_model_json(&path, &model).unwrap();
        assert!(read_model_json(&path).is_err());
    }
}
