use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Invalid inputs to a distribution run. Raised before any student is placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no sections supplied: there is nowhere to place students")]
    NoSections,

    #[error("every section has zero capacity")]
    NoCapacity,

    #[error("duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("duplicate student id in roster: {0}")]
    DuplicateStudent(String),
}

/// Failures raised by the grade predictor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("grade predictor has not been trained yet")]
    NotTrained,

    #[error("not enough grade history to train: {examples} usable example(s), need at least 2")]
    InsufficientData { examples: usize },

    #[error("least-squares system could not be solved")]
    Singular,
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        AppError::new(2, format!("Configuration error: {err}"))
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        let code = match err {
            PredictError::NotTrained | PredictError::InsufficientData { .. } => 3,
            PredictError::Singular => 4,
        };
        AppError::new(code, format!("Prediction error: {err}"))
    }
}
