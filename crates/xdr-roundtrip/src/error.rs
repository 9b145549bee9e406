//! Error types for the round-trip harness.

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a round trip.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XDR encoding/decoding error.
    #[error("XDR error: {0}")]
    Xdr(#[from] xdr_codec::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed the connection before a full buffer arrived.
    #[error("connection closed after {received} of {expected} bytes")]
    ConnectionClosed { received: usize, expected: usize },

    /// Timeout error.
    #[error("operation timed out")]
    Timeout,

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error came from the codec rather than the transport.
    pub fn is_codec(&self) -> bool {
        matches!(self, Error::Xdr(_))
    }
}
