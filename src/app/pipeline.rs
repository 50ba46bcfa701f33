//! Shared "distribution pipeline" logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! store -> grade history -> predicted scores -> distribute -> export
//!
//! The CLI can then focus on presentation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::distribute::{Distribution, distribute};
use crate::domain::{DistributeConfig, StudentRecord};
use crate::error::AppError;
use crate::io::{Store, load_predictor, write_distribution_csv, write_model_json};
use crate::predict::{GradeHistory, GradePredictor, Predictor, TrainReport, WINDOW};

/// Where a student's predicted score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// The trained grade predictor.
    Model,
    /// Mean of the recorded grades (short history or no usable model).
    GradeMean,
    /// No grades at all: the neutral score.
    Neutral,
}

/// Predicted scores for a roster.
#[derive(Debug, Clone, Default)]
pub struct Scores {
    pub values: HashMap<String, f64>,
    pub sources: HashMap<String, ScoreSource>,
}

/// All computed outputs of a single `roster distribute` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub distribution: Distribution,
    pub scores: Scores,
    pub export_path: PathBuf,
    pub exported_rows: usize,
}

/// Score every student from their grade history.
///
/// - at least `WINDOW` grades and a working predictor: model prediction
/// - otherwise the mean of their grades, or `neutral` if they have none
pub fn score_students(
    students: &[StudentRecord],
    history: &GradeHistory,
    predictor: &impl Predictor,
    neutral: f64,
) -> Scores {
    let mut scores = Scores::default();

    for s in students {
        let grades = history.grades_for(&s.id);
        let mean = (!grades.is_empty()).then(|| grades.iter().sum::<f64>() / grades.len() as f64);

        let (value, source) = if grades.len() >= WINDOW {
            match predictor.predict(grades) {
                Ok(v) => (v, ScoreSource::Model),
                Err(e) => {
                    warn!(student = %s.id, error = %e, "prediction failed; using grade mean");
                    (mean.unwrap_or(neutral), ScoreSource::GradeMean)
                }
            }
        } else if let Some(m) = mean {
            (m, ScoreSource::GradeMean)
        } else {
            (neutral, ScoreSource::Neutral)
        };

        debug!(student = %s.id, score = value, source = ?source, "scored student");
        scores.values.insert(s.id.clone(), value);
        scores.sources.insert(s.id.clone(), source);
    }

    scores
}

/// Train the predictor on the store's grade history and save it.
pub fn run_training(store: &Store) -> Result<TrainReport, AppError> {
    let history = store.grade_history()?;
    let mut predictor = GradePredictor::untrained();
    let report = predictor.train(&history)?;

    if let Some(model) = predictor.model() {
        write_model_json(&store.model_path(), model)?;
        info!(path = %store.model_path().display(), "saved grade predictor");
    }
    Ok(report)
}

/// Predict one student's score with the saved model.
pub fn run_prediction(store: &Store, student_id: &str) -> Result<f64, AppError> {
    let students = store.all_students()?;
    if !students.iter().any(|s| s.id == student_id) {
        return Err(AppError::new(2, format!("Unknown student '{student_id}'.")));
    }
    let history = store.grade_history()?;
    let predictor = load_predictor(&store.model_path())?;
    Ok(predictor.predict(history.grades_for(student_id))?)
}

/// Execute the full distribution pipeline and export the result.
pub fn run_distribution(
    store: &Store,
    config: &DistributeConfig,
    export_path: Option<&Path>,
) -> Result<RunOutput, AppError> {
    let students = store.all_students()?;
    let sections = store.all_sections()?;
    let history = store.grade_history()?;

    let predictor = load_predictor(&store.model_path()).unwrap_or_else(|e| {
        warn!(error = %e, "saved grade predictor is unusable; ignoring it");
        GradePredictor::untrained()
    });
    if !predictor.is_trained() {
        warn!("grade predictor is not trained; scoring from grade means");
    }

    let scores = score_students(&students, &history, &predictor, config.neutral_score);
    let distribution = distribute(&students, &sections, &scores.values, config)?;

    let export_path = export_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| store.results_path());
    let exported_rows = write_distribution_csv(&export_path, &distribution)?;
    info!(path = %export_path.display(), rows = exported_rows, "exported distribution");

    Ok(RunOutput {
        distribution,
        scores,
        export_path,
        exported_rows,
    })
}
