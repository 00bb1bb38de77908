//! Error types for the designer crate.

use thiserror::Error;

/// Errors raised while turning sketch input into coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// Grid size must be at least one canvas unit.
    #[error("Invalid snap size: {0} (must be positive)")]
    InvalidSnapSize(i32),

    /// A script line named a command that does not exist.
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// A script command had the wrong number of arguments.
    #[error("'{command}' expects {expected} arguments, got {actual}")]
    WrongArity {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// An argument was not an integer.
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
}

/// Result type alias for designer operations.
pub type SketchResult<T> = Result<T, SketchError>;
