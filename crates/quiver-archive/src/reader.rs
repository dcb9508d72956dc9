//! Archive document reading operations.
//!
//! This module provides an async reader that consumes a whole JSON array
//! document from any [`AsyncRead`] source with efficient buffering.

use crate::Result;
use crate::document::{decode_array, decode_array_resilient};
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

/// Async reader for JSON array documents.
///
/// `ArchiveReader` wraps an async reader and decodes one whole archive
/// document from it. The document is read to completion before decoding
/// since a JSON array is a single value.
///
/// # Type Parameters
///
/// * `R` - The underlying async reader type. Must implement [`AsyncRead`]
///   and [`Unpin`].
///
/// # Examples
///
/// ```no_run
/// use quiver_archive::ArchiveReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("queries.json").await?;
/// let mut reader = ArchiveReader::new(file);
/// let records: Vec<serde_json::Value> = reader.read_document().await?;
/// # Ok(())
/// # }
/// ```
pub struct ArchiveReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> ArchiveReader<R> {
    /// Creates a new `ArchiveReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Creates a new `ArchiveReader` with a custom buffer capacity.
    ///
    /// Useful when the typical document size is known in advance.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
        }
    }

    /// Reads the source to completion and strictly decodes the document.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the content is not valid JSON,
    /// the top-level value is not an array, or any element fails to decode.
    pub async fn read_document<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let text = self.read_to_string().await?;
        decode_array(&text)
    }

    /// Reads the source to completion and resiliently decodes the document.
    ///
    /// Malformed elements are skipped and reported as [`Warning`]s.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the content is not valid JSON,
    /// or the top-level value is not an array.
    pub async fn read_document_resilient<T: DeserializeOwned>(
        &mut self,
    ) -> Result<(Vec<T>, Vec<Warning>)> {
        let text = self.read_to_string().await?;
        decode_array_resilient(&text)
    }

    /// Reads the underlying source to completion as UTF-8 text.
    async fn read_to_string(&mut self) -> Result<String> {
        let mut text = String::new();
        self.reader.read_to_string(&mut text).await?;
        Ok(text)
    }

    /// Returns a reference to the underlying buffered reader.
    #[must_use]
    pub fn get_ref(&self) -> &BufReader<R> {
        &self.reader
    }

    /// Returns a mutable reference to the underlying buffered reader.
    pub fn get_mut(&mut self) -> &mut BufReader<R> {
        &mut self.reader
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}
