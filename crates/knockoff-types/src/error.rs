use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnockoffError {
    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Non-finite entry at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("Matrix is not symmetric: |G[{row},{col}] - G[{col},{row}]| = {delta:e}")]
    Asymmetric { row: usize, col: usize, delta: f64 },

    #[error("Solver error: {0}")]
    SolverError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for KnockoffError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            KnockoffError::IoError(err.to_string())
        } else {
            KnockoffError::SerializationError(err.to_string())
        }
    }
}

impl From<std::io::Error> for KnockoffError {
    fn from(err: std::io::Error) -> Self {
        KnockoffError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KnockoffError>;
