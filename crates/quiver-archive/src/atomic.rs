//! Atomic write operations for archive documents.
//!
//! This module provides functionality for atomically writing a whole JSON
//! array document to a file, using the temp-file-then-rename pattern.
//!
//! # Atomicity Guarantee
//!
//! On POSIX systems, file renames within the same filesystem are atomic
//! operations. This module exploits that property:
//!
//! 1. The document is written to a temporary file with a `.tmp` extension
//! 2. The temporary file is flushed and closed
//! 3. The temporary file is atomically renamed to the target path
//!
//! If a crash occurs during step 1 or 2, the original file remains intact.
//!
//! # Examples
//!
//! ```no_run
//! use quiver_archive::write_array_atomic;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Record {
//!     id: u32,
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     Record { id: 1, name: "Alice".to_string() },
//!     Record { id: 2, name: "Bob".to_string() },
//! ];
//!
//! write_array_atomic("records.json", &records).await?;
//! # Ok(())
//! # }
//! ```

use crate::Result;
use crate::writer::ArchiveWriter;
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;

/// Atomically writes a slice of records as a JSON array document.
///
/// The document is first written in full to a temporary file alongside the
/// target, then renamed over it, so the target is never left in a
/// partially-written state.
///
/// # Errors
///
/// Returns an error if:
/// - The temporary file cannot be created
/// - Any record fails to serialize
/// - An I/O error occurs during writing
/// - The atomic rename fails (e.g., cross-filesystem move)
///
/// On failure, the original file (if it exists) is left unchanged and the
/// temporary file is removed on a best-effort basis.
pub async fn write_array_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    let write_result = write_to_temp_file(&temp_path, values).await;

    if let Err(e) = write_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Atomically writes an iterator of records as a JSON array document.
///
/// A more flexible version of [`write_array_atomic`] that accepts any
/// iterator of serializable values. The values are collected before
/// serialization since a JSON array is encoded as one document.
///
/// # Errors
///
/// See [`write_array_atomic`] for error conditions.
pub async fn write_array_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let collected: Vec<T> = values.into_iter().collect();
    write_array_atomic(path, &collected).await
}

/// Creates a temporary file path for atomic write operations.
///
/// The temp path is created by appending `.tmp` to the original filename.
/// If the original path has no extension, `.tmp` is appended directly.
/// If it has an extension, the extension is replaced with `{ext}.tmp`.
fn make_temp_path(path: &Path) -> std::path::PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

/// Writes the document to a temporary file, ensuring proper flush and close.
async fn write_to_temp_file<T>(temp_path: &Path, values: &[T]) -> Result<()>
where
    T: Serialize,
{
    let file = File::create(temp_path).await?;
    let mut writer = ArchiveWriter::new(file);
    writer.write_document(values).await?;
    writer.flush().await?;
    Ok(())
}
