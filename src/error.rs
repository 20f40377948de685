//! Error types for wordsearch
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SearchError
pub type Result<T> = std::result::Result<T, SearchError>;

/// Unified error type for wordsearch operations
#[derive(Debug, Error)]
pub enum SearchError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Startup Errors
    // -------------------------------------------------------------------------
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corpus error: {0}")]
    Corpus(String),

    // -------------------------------------------------------------------------
    // Protocol / Client Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Not connected to server")]
    NotConnected,

    #[error("Connection closed by peer")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// True when the error means the peer went away rather than something
    /// actually failing.
    pub fn is_disconnect(&self) -> bool {
        match self {
            SearchError::ConnectionClosed => true,
            SearchError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
