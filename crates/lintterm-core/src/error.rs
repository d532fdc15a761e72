//! Error types for lintterm.

use std::sync::Arc;

use thiserror::Error;

/// Main error type for lintterm operations.
///
/// The type is `Clone` so a single in-flight terminal creation can hand the
/// same failure to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The terminal host failed to create a terminal
    #[error("Terminal creation failed: {0}")]
    TerminalCreation(String),

    /// Environment activation inside a new terminal failed
    #[error("Environment activation failed: {0}")]
    Activation(String),

    /// The terminal closed before it became usable
    #[error("Terminal closed before it was ready")]
    TerminalClosed,

    /// The terminal service has been disposed
    #[error("Terminal service has been disposed")]
    TerminalDisposed,

    /// Too many cached terminal services
    #[error("Terminal limit reached (max: {0})")]
    TerminalLimitReached(usize),

    /// A lint pass raised an error
    #[error("Lint failed: {0}")]
    Lint(String),

    /// Looking up the active linters failed
    #[error("Linter lookup failed: {0}")]
    LinterLookup(String),

    /// No Tokio runtime was available to run background work
    #[error("No Tokio runtime available")]
    NoRuntime,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
