//! Error types.

use std::io;

use ndarray::ShapeError;
use thiserror::Error;

/// `Result` type alias for operations that can lead to errors.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors in reading embeddings or evaluating WEAT cases.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error.
    #[error("{desc}: {error}")]
    Io { desc: String, error: io::Error },

    /// Invalid file format.
    #[error("Invalid file format: {0}")]
    Format(String),

    /// `ndarray` shape error.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Case definitions could not be deserialized.
    #[error("Cannot read case definitions: {0}")]
    Json(#[from] serde_json::Error),

    /// Results table could not be read or written.
    #[error("Cannot read or write results table: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be deserialized.
    #[error("Cannot read configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Empty, duplicated or overlapping word sets, mismatched vector
    /// lengths.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A word is not in the embedding vocabulary.
    #[error("Word '{word}' of set '{set}' is not in the vocabulary")]
    WordNotFound { word: String, set: String },

    /// Division by zero, such as the cosine similarity of a zero vector.
    #[error("Division by zero: {0}")]
    DivideByZero(String),

    /// The statistic is not defined for the given set sizes.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The permutation test was cancelled before any partition was evaluated.
    #[error("Permutation test cancelled before evaluating any partition")]
    Cancelled,

    /// The permutation test timed out before any partition was evaluated.
    #[error("Permutation test timed out before evaluating any partition")]
    Timeout,
}

impl Error {
    pub fn io_error(desc: impl Into<String>, error: io::Error) -> Self {
        Error::Io {
            desc: desc.into(),
            error,
        }
    }
}
