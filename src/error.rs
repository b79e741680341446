//! Error types for the Vimoji library.
//!
//! All errors are represented by the [`VimojiError`] enum. The variants follow
//! the failure classes of the suggestion pipeline:
//!
//! - [`VimojiError::Config`] is fatal at startup (bad catalog, bad weights).
//! - [`VimojiError::Inference`] is raised by external model calls and is
//!   recovered inside the engine by running the ensemble in degraded mode.
//! - [`VimojiError::InvalidMethod`] rejects a request before any scoring work.
//! - [`VimojiError::NoSignal`] means every scorer that was asked to run failed.
//!
//! # Examples
//!
//! ```
//! use vimoji::error::{VimojiError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(VimojiError::config("emoji table is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Vimoji operations.
#[derive(Error, Debug)]
pub enum VimojiError {
    /// Catalog or engine configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external inference backend was unreachable, timed out, or returned
    /// malformed output.
    #[error("Inference error: {0}")]
    Inference(String),

    /// The method selector is not recognized or names a scorer that is not
    /// configured.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Every active scorer failed for a request.
    #[error("No signal: {0}")]
    NoSignal(String),

    /// I/O errors (configuration files, datasets)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

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

/// Result type alias for operations that may fail with VimojiError.
pub type Result<T> = std::result::Result<T, VimojiError>;

impl VimojiError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VimojiError::Config(msg.into())
    }

    /// Create a new inference error.
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        VimojiError::Inference(msg.into())
    }

    /// Create a new invalid method error.
    pub fn invalid_method<S: Into<String>>(msg: S) -> Self {
        VimojiError::InvalidMethod(msg.into())
    }

    /// Create a new no-signal error.
    pub fn no_signal<S: Into<String>>(msg: S) -> Self {
        VimojiError::NoSignal(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        VimojiError::Other(msg.into())
    }

    /// Create a new timeout error. Timeouts of model calls are inference
    /// failures.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        VimojiError::Inference(format!("Timeout: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        VimojiError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error is recovered locally by degrading a single scorer.
    pub fn is_inference(&self) -> bool {
        matches!(self, VimojiError::Inference(_))
    }
}
