//! Error types for XDR encoding/decoding.

use std::fmt;

use crate::cursor::Mode;

/// Result type for XDR operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving an XDR cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Custom error message from serde.
    #[error("{0}")]
    Message(String),

    /// Malformed cursor construction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation would read or write past the bound capacity.
    #[error("buffer overrun: {requested} bytes at position {position} exceeds capacity {capacity}")]
    BufferOverrun {
        position: usize,
        requested: usize,
        capacity: usize,
    },

    /// Operation issued against a cursor of the other direction.
    #[error("cursor is in {actual} mode, operation requires {expected} mode")]
    WrongMode { expected: Mode, actual: Mode },

    /// Invalid boolean value (must be 0 or 1).
    #[error("invalid boolean value: {0}")]
    InvalidBool(u32),

    /// String is not valid UTF-8.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// Variable-length item exceeds its declared maximum.
    #[error("length {0} exceeds maximum {1}")]
    LengthExceeded(usize, usize),

    /// Trailing data after deserialization.
    #[error("trailing data: {0} bytes remaining")]
    TrailingData(usize),
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
