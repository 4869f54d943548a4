//! Error types for the Coco library.
//!
//! All errors are represented by the [`CocoError`] enum. Training-corpus
//! problems and model-file problems get their own variants so callers can
//! tell a bad input file from a bad model file.
//!
//! # Examples
//!
//! ```
//! use coco::error::{CocoError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CocoError::model("declared count does not match"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Coco operations.
#[derive(Error, Debug)]
pub enum CocoError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Training-corpus errors (unreadable or unusable corpus)
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Probability-model file errors (unreadable or malformed)
    #[error("Model error: {0}")]
    Model(String),

    /// Analysis-related errors (normalization, tokenization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CocoError.
pub type Result<T> = std::result::Result<T, CocoError>;

impl CocoError {
    /// Create a new corpus error.
    pub fn corpus<S: Into<String>>(msg: S) -> Self {
        CocoError::Corpus(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        CocoError::Model(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        CocoError::Analysis(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CocoError::Other(msg.into())
    }
}
