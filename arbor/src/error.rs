//! Error types.
//!
//! Tree operations themselves never fail: rejected moves, missing nodes and
//! unresolved children all degrade to `false`/`None`/empty results. The types
//! here cover the two places where a real failure has to be described: a
//! children loader that could not produce its items, and options text that
//! could not be parsed.

use thiserror::Error;

/// Error reported by a children loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    /// Error message
    pub message: String,
}

impl LoadError {
    /// Create a new load error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LoadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors that can occur while reading tree options from text.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The options document is not valid JSON or has the wrong shape.
    #[error("Invalid tree options: {0}")]
    Parse(#[from] serde_json::Error),
}
