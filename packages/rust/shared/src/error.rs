//! Error types for PageForge.
//!
//! Library crates use [`PageForgeError`] via `thiserror`. The embedding
//! application decides how to surface these (this workspace has no app
//! surface of its own).

use std::path::PathBuf;

/// Top-level error type for all PageForge operations.
#[derive(Debug, thiserror::Error)]
pub enum PageForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the chat-completion API.
    #[error("network error: {0}")]
    Network(String),

    /// Response decoding or document parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Database or storage layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Fatal continuation-loop failure (carries the website id for correlation).
    #[error("generation error: {0}")]
    Generation(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (empty input, invalid identifier, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageForgeError>;

impl PageForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PageForgeError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = PageForgeError::validation("initial messages must not be empty");
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn generation_error_carries_context() {
        let err = PageForgeError::Generation("generation failed for site-42: boom".into());
        assert!(err.to_string().contains("site-42"));
        assert!(err.to_string().contains("boom"));
    }
}
