//! Archive persistence for in-memory storage.
//!
//! This module provides functions to load and save the in-memory storage
//! as a single JSON array document on disk.

use super::inner::InMemoryStorageInner;
use crate::domain::{QueryRecord, RecordId};
use crate::error::{Error, Result};
use crate::storage::QueryStorage;
use quiver_archive::{read_array_document_resilient, write_array_atomic, Warning as ArchiveWarning};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Warnings that can occur during archive file loading.
///
/// These are non-fatal issues that don't prevent loading but indicate
/// data quality problems in the archive document. When warnings occur, the
/// load operation continues but problematic data is skipped.
///
/// # Handling Warnings
///
/// Applications should log or report these warnings to users, as they
/// indicate data corruption or integrity issues that may need manual
/// resolution.
///
/// **Example:**
/// ```no_run
/// # use quiver::storage::in_memory::load_from_archive;
/// # use std::path::Path;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let (storage, warnings) = load_from_archive(Path::new(".quiver/queries.json")).await?;
///
/// for warning in warnings {
///     match warning {
///         quiver::storage::in_memory::LoadWarning::MalformedRecord { index, error } => {
///             eprintln!("Skipped malformed record at index {}: {}", index, error);
///         }
///         quiver::storage::in_memory::LoadWarning::DuplicateId { index, id } => {
///             eprintln!("Skipped record at index {} with duplicate id {}", index, id);
///         }
///         quiver::storage::in_memory::LoadWarning::InvalidRecordData { index, id, error } => {
///             eprintln!("Skipped invalid record {} at index {}: {}", id, index, error);
///         }
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub enum LoadWarning {
    /// Malformed array element that couldn't be decoded
    ///
    /// **Effect**: Element is skipped entirely; no record created from it.
    /// **Common causes**: File corruption, manual editing errors, incomplete writes.
    MalformedRecord {
        /// Position of the element within the document array.
        index: usize,
        /// Description of the decode error.
        error: String,
    },

    /// Record whose id duplicates one loaded earlier from the same file
    ///
    /// **Effect**: The later record is skipped; the earlier one is kept.
    /// **Common causes**: Manual file edits, naively concatenated exports.
    DuplicateId {
        /// Position of the skipped record among the decoded elements.
        index: usize,
        /// The id both records carry.
        id: RecordId,
    },

    /// Record data failed validation (empty name or query, dangling
    /// current-version reference)
    ///
    /// **Effect**: The entire record is skipped and not loaded into storage.
    /// **Common causes**: Manual editing, data corruption.
    InvalidRecordData {
        /// Position of the skipped record among the decoded elements.
        index: usize,
        /// The id the record carries.
        id: RecordId,
        /// Description of the validation failure.
        error: String,
    },
}

fn archive_error(e: quiver_archive::Error) -> Error {
    match e {
        quiver_archive::Error::Io(io_err) => Error::Io(io_err),
        quiver_archive::Error::Json(json_err) => Error::Json(json_err),
        other => Error::Archive(other),
    }
}

/// Load storage from an archive document.
///
/// This function reads a JSON array document where each element is a
/// serialized `QueryRecord` and rebuilds the in-memory collection.
///
/// # Error Handling
///
/// - **Malformed elements**: Skipped with a warning
/// - **Invalid records**: Skipped with a warning
/// - **Duplicate ids**: The later record is skipped with a warning
///
/// A missing or unreadable file, or a document whose top level is not a
/// JSON array, is a hard error.
///
/// # Returns
///
/// Returns a tuple of `(storage, warnings)` where warnings contains all
/// non-fatal issues encountered during loading.
pub async fn load_from_archive(path: &Path) -> Result<(Box<dyn QueryStorage>, Vec<LoadWarning>)> {
    // First pass: resilient decoding via quiver-archive
    let (parsed_records, archive_warnings) = read_array_document_resilient::<QueryRecord, _>(path)
        .await
        .map_err(archive_error)?;

    let mut warnings = Vec::new();

    // Convert quiver-archive warnings to LoadWarnings
    for warning in archive_warnings {
        let ArchiveWarning::MalformedElement { index, error } = warning;
        warnings.push(LoadWarning::MalformedRecord { index, error });
    }

    // Second pass: validate records, drop duplicate ids, fill storage.
    // Note: index here is the position within successfully decoded
    // elements, not the element's position in the original document when
    // malformed elements were skipped.
    let storage = Arc::new(Mutex::new(InMemoryStorageInner::new()));
    let mut inner = storage.lock().await;

    for (index, record) in parsed_records.into_iter().enumerate() {
        if let Err(validation_error) = record.validate() {
            warnings.push(LoadWarning::InvalidRecordData {
                index,
                id: record.id,
                error: validation_error,
            });
            continue;
        }
        if inner.records.contains_key(&record.id) {
            warnings.push(LoadWarning::DuplicateId {
                index,
                id: record.id,
            });
            continue;
        }
        inner.register_record(&record);
        inner.records.insert(record.id, record);
    }

    // Release lock before returning
    drop(inner);

    Ok((Box::new(storage), warnings))
}

/// Save storage to an archive document with atomic writes.
///
/// This function writes all records as one pretty-printed JSON array
/// document, so the file diffs cleanly under version control.
///
/// # Atomicity
///
/// The write goes to a temporary file first, then renames it over the
/// target. If the process crashes or is interrupted, the original file
/// remains unchanged.
pub async fn save_to_archive(storage: &dyn QueryStorage, path: &Path) -> Result<()> {
    // Export is already in creation order, which keeps the document
    // stable across saves
    let records = storage.export_all().await?;

    write_array_atomic(path, &records)
        .await
        .map_err(archive_error)?;

    Ok(())
}
