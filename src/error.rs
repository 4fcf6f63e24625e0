use crate::engines::evaluation::EvaluationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Invalid range for input {id}: min {min}, max {max}, step {step}")]
    InvalidRange {
        id: String,
        min: f64,
        max: f64,
        step: f64,
    },

    #[error("Unknown input: {0}")]
    UnknownInput(String),

    #[error("Missing value for input: {0}")]
    MissingInput(String),

    #[error("Insufficient valid genes: need 2, found {found}")]
    InsufficientValidGenes { found: usize },

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Input source error: {0}")]
    InputSource(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
