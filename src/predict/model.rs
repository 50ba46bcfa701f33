//! Linear grade forecaster.
//!
//! `y = b0 + b1*g[t-3] + b2*g[t-2] + b3*g[t-1]`, fitted by ordinary least squares
//! on every full window in the grade history. A seeded fifth of the examples is
//! held out to report R².

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{SCORE_MAX, SCORE_MIN};
use crate::error::PredictError;
use crate::math::{fit_with_intercept, r_squared};
use crate::predict::features::{GradeHistory, prediction_window, training_examples};

/// Fraction of examples held out for scoring.
const TEST_FRACTION: f64 = 0.2;
/// Seed for the train/test split.
const SPLIT_SEED: u64 = 42;
/// Minimum number of examples required to train.
const MIN_EXAMPLES: usize = 2;

/// Anything that turns a grade history into a single predicted score.
pub trait Predictor {
    fn predict(&self, previous_grades: &[f64]) -> Result<f64, PredictError>;
}

/// Outcome of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// R² on the held-out examples; `None` when it is undefined for that set.
    pub r2: Option<f64>,
    pub n_train: usize,
    pub n_test: usize,
}

/// Fitted coefficients (portable, saved as JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    /// One coefficient per window slot, oldest grade first.
    pub coefficients: Vec<f64>,
    pub report: TrainReport,
    pub trained_at: DateTime<Utc>,
}

impl LinearModel {
    fn evaluate(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GradePredictor {
    model: Option<LinearModel>,
}

impl GradePredictor {
    pub fn untrained() -> Self {
        Self { model: None }
    }

    pub fn from_model(model: LinearModel) -> Self {
        Self { model: Some(model) }
    }

    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Fit a new model from `history`, replacing any previous one.
    pub fn train(&mut self, history: &GradeHistory) -> Result<TrainReport, PredictError> {
        let (features, targets) = training_examples(history);
        let n = features.len();
        if n < MIN_EXAMPLES {
            return Err(PredictError::InsufficientData { examples: n });
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut StdRng::seed_from_u64(SPLIT_SEED));
        let n_test = ((n as f64 * TEST_FRACTION).ceil() as usize).clamp(1, n - 1);
        let (test_idx, train_idx) = order.split_at(n_test);

        let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| features[i].clone()).collect();
        let train_y: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();

        let (intercept, coefficients) =
            fit_with_intercept(&train_x, &train_y).ok_or(PredictError::Singular)?;

        let mut model = LinearModel {
            intercept,
            coefficients,
            report: TrainReport {
                r2: None,
                n_train: train_idx.len(),
                n_test,
            },
            trained_at: Utc::now(),
        };

        let test_y: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();
        let test_pred: Vec<f64> = test_idx.iter().map(|&i| model.evaluate(&features[i])).collect();
        model.report.r2 = r_squared(&test_y, &test_pred);

        info!(
            examples = n,
            n_train = model.report.n_train,
            n_test,
            r2 = ?model.report.r2,
            "trained grade predictor"
        );

        let report = model.report;
        self.model = Some(model);
        Ok(report)
    }
}

impl Predictor for GradePredictor {
    fn predict(&self, previous_grades: &[f64]) -> Result<f64, PredictError> {
        let model = self.model.as_ref().ok_or(PredictError::NotTrained)?;
        let raw = model.evaluate(&prediction_window(previous_grades));
        if !raw.is_finite() {
            return Err(PredictError::Singular);
        }
        Ok(raw.clamp(SCORE_MIN, SCORE_MAX))
    }
}
