//! Error types for Taskdeck.
//!
//! Most failure modes in this application degrade gracefully by design:
//! malformed persisted state resets to empty, invalid input and unknown ids
//! are silent no-ops, and best-effort capabilities (cues, storage writes)
//! swallow their failures. The types here cover the remaining fatal class:
//! process startup (configuration) and terminal management.

use thiserror::Error;

use crate::config::ConfigError;

/// Top-level error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TUI-related error.
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors that can occur during TUI operation.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal initialization failed.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    /// Terminal rendering failed.
    #[error("render error: {0}")]
    Render(#[source] std::io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(String),
}

/// A specialized `Result` type for Taskdeck operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = AppError::Config(ConfigError::NoHomeDirectory);
        assert_eq!(
            err.to_string(),
            "configuration error: failed to determine home directory"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AppError = io_err.into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn tui_error_display() {
        let io_err = std::io::Error::other("raw mode failed");
        let err = TuiError::TerminalInit(io_err);
        assert_eq!(
            err.to_string(),
            "failed to initialize terminal: raw mode failed"
        );
    }

    #[test]
    fn tui_error_to_app_error_conversion() {
        let tui_err = TuiError::Event("poll failed".to_string());
        let err: AppError = tui_err.into();
        assert!(matches!(err, AppError::Tui(_)));
        assert_eq!(err.to_string(), "TUI error: event error: poll failed");
    }

    #[test]
    fn error_source_chain() {
        use std::error::Error;

        let io_err = std::io::Error::other("write failed");
        let err = TuiError::Render(io_err);
        assert!(err.source().is_some());
    }
}
