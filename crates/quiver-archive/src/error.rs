//! Error types for quiver-archive operations.

use std::io;
use thiserror::Error;

/// The error type for quiver-archive operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not a JSON array at the top level.
    #[error("Invalid archive document: {0}")]
    InvalidFormat(String),

    /// An array element failed to decode into the target record type.
    #[error("element {index}: {source}")]
    Element {
        /// Zero-based index of the element within the document array.
        index: usize,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// A specialized Result type for quiver-archive operations.
pub type Result<T> = std::result::Result<T, Error>;
