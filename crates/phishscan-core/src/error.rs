//! Error types for URL checking.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectError>;

#[derive(Error, Debug)]
pub enum DetectError {
    /// The URL could not be turned into a feature vector. Terminal for the request.
    #[error("feature extraction failed: {0}")]
    Extraction(String),

    /// The model artifact is missing or unreadable. No predictions are possible.
    #[error("failed to load model {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// The classifier rejected the aligned row or returned malformed output.
    #[error("model prediction failed: {0}")]
    Prediction(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
