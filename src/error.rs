//! Error types for the cyra configuration library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while declaring a schema or loading/saving a config
#[derive(Debug, Error)]
pub enum CyraError {
    /// Bad key segment, empty path, duplicate entry or excess pop.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot convert {found} to {expected} for `{path}`")]
    Coercion {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("Config document parsing error: {0}")]
    Parse(#[from] toml_edit::TomlError),

    #[error("Value serialization error: {0}")]
    Serialize(String),

    #[error("IO error when accessing `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

impl CyraError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CyraError::InvalidArgument(msg.into())
    }
}
