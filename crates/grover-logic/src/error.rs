//! Error codes for table building, histogram loading and game setup

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroverError {
    #[error("Counts sum to zero; cannot build a probability table")]
    InvalidInput,

    #[error("Counts overflow a 64-bit total")]
    CountOverflow,

    #[error("Unknown measurement outcome {0:?} (expected one of 00, 01, 10, 11)")]
    UnknownOutcome(String),

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GroverError>;
