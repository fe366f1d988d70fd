//! Errors raised by the outer surfaces (snapshot files, configuration).
//!
//! The engine itself never fails; only loading and saving can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type LinkageResult<T> = Result<T, LinkageError>;

impl LinkageError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
