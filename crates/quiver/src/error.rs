//! Error types for quiver operations.

use crate::domain::{RecordId, VersionId};
use thiserror::Error;

/// The error type for quiver operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or empty on create or update.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation referenced a record id not present in the collection.
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// The operation referenced a version id not present on the record.
    #[error("Version {version} not found on record {record}")]
    VersionNotFound {
        /// The record whose history was searched.
        record: RecordId,
        /// The version id that was not found.
        version: VersionId,
    },

    /// The import payload was malformed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Repository configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Archive document read or write failure.
    #[error("Archive error: {0}")]
    Archive(#[from] quiver_archive::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while decoding an import payload.
///
/// Import is strict: any malformed element fails the whole import and
/// leaves the collection unchanged.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The top-level value of the payload was not a JSON array.
    #[error("Import payload must be a JSON array: {0}")]
    NotAnArray(String),

    /// The payload was not valid JSON at all.
    #[error("Import payload is not valid JSON: {0}")]
    InvalidJson(String),

    /// An element of the payload failed to decode into a record.
    #[error("Import payload element {index} is malformed: {message}")]
    Element {
        /// Zero-based index of the element within the payload array.
        index: usize,
        /// Description of the decode failure.
        message: String,
    },
}

/// Errors raised while locating or reading repository configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.quiver` directory was found in the working directory or any
    /// parent.
    #[error("Not a quiver repository (no .quiver directory found). Run 'quiver init' first.")]
    NotInitialized,

    /// `init` was asked to create a repository where one already exists.
    #[error("Quiver is already initialized in this directory. Found existing '{0}'")]
    AlreadyInitialized(String),

    /// The config file exists but could not be parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The config names a storage backend this build does not know.
    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),
}

/// A specialized Result type for quiver operations.
pub type Result<T> = std::result::Result<T, Error>;
