//! Error types for Synheart Motion

use thiserror::Error;

/// Errors that can occur during frame processing and encoding
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Failed to parse frame payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid landmark frame: {0}")]
    InvalidFrame(String),

    #[error("Timestamp parse error: {0}")]
    TimestampError(String),

    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("Unknown sport: {0}")]
    UnknownSport(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by persistence collaborators.
///
/// Storage failures are recoverable: in-memory tracking state is never
/// affected by a failed append or read.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid store document: {0}")]
    InvalidDocument(String),
}
