//! Error handling for VectorLink
//!
//! Provides error types for each layer of the pipeline:
//! - Encoding errors (coordinate to wire frame)
//! - Connection errors (serial channel open and I/O)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Encoding error type
///
/// Raised when a coordinate cannot be represented in the fixed-width wire
/// frame, or when a frame cannot be decoded back into a coordinate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A field does not fit in two hex digits
    #[error("Field {field} out of range: {value} (expected 0..=255)")]
    OutOfRange {
        /// The offending field name (`x`, `y` or `z`).
        field: &'static str,
        /// The value that was rejected.
        value: i32,
    },

    /// Identifier character is not a known shape tag
    #[error("Unknown identifier '{identifier}'")]
    UnknownIdentifier {
        /// The character that was not recognised.
        identifier: char,
    },

    /// Frame text does not match `<id>0x<HEX2><HEX2><HEX2>`
    #[error("Malformed frame '{frame}': {reason}")]
    MalformedFrame {
        /// The frame text.
        frame: String,
        /// Why the frame was rejected.
        reason: String,
    },
}

/// Connection error type
///
/// Represents errors related to the serial channel carrying frames to the
/// device. `FailedToOpen` maps to a channel open failure; `Io` maps to a read
/// or write failure on an open channel.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Read or write failed on an open channel
    #[error("I/O error on {port}: {reason}")]
    Io {
        /// The name of the port.
        port: String,
        /// The reason for the I/O error.
        reason: String,
    },

    /// Reconnect attempts were used up
    #[error("Gave up reconnecting to {port} after {attempts} attempts")]
    ReconnectExhausted {
        /// The name of the port.
        port: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// Invalid connection parameters
    #[error("Invalid connection parameters: {reason}")]
    InvalidParameters {
        /// The reason the parameters are invalid.
        reason: String,
    },
}

impl ConnectionError {
    /// Whether this error happened while opening the channel
    pub fn is_open_failure(&self) -> bool {
        matches!(self, ConnectionError::FailedToOpen { .. })
    }
}

/// Main error type for VectorLink
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Encoding error
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
