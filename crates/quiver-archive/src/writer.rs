//! Archive document writing operations.
//!
//! This module provides an async writer that encodes a whole JSON array
//! document to any [`AsyncWrite`] sink with efficient buffering.

use crate::Result;
use crate::document::encode_array_pretty;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for JSON array documents.
///
/// `ArchiveWriter` wraps an async writer and encodes a slice of records as
/// one pretty-printed JSON array. Writes are buffered; call
/// [`flush`](Self::flush) before dropping the writer to ensure all data
/// reaches the underlying sink.
///
/// # Type Parameters
///
/// * `W` - The underlying async writer type. Must implement [`AsyncWrite`]
///   and [`Unpin`].
///
/// # Examples
///
/// ```no_run
/// use quiver_archive::ArchiveWriter;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("queries.json").await?;
/// let mut writer = ArchiveWriter::new(file);
/// writer.write_document(&[serde_json::json!({"id": 1})]).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct ArchiveWriter<W> {
    /// Buffered writer wrapping the underlying async writer.
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> ArchiveWriter<W> {
    /// Creates a new `ArchiveWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Creates a new `ArchiveWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
        }
    }

    /// Encodes the records as a pretty-printed JSON array and writes it.
    ///
    /// The encoded document ends with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the write fails.
    pub async fn write_document<T: Serialize>(&mut self, values: &[T]) -> Result<()> {
        let text = encode_array_pretty(values)?;
        self.writer.write_all(text.as_bytes()).await?;
        Ok(())
    }

    /// Flushes the internal buffer to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Returns a reference to the underlying buffered writer.
    #[must_use]
    pub fn get_ref(&self) -> &BufWriter<W> {
        &self.writer
    }

    /// Returns a mutable reference to the underlying buffered writer.
    pub fn get_mut(&mut self) -> &mut BufWriter<W> {
        &mut self.writer
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// Any unflushed data in the buffer is lost; call
    /// [`flush`](Self::flush) first.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}

impl<W: AsyncWrite + Unpin + Default> Default for ArchiveWriter<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::decode_array;
    use serde::{Deserialize, Serialize};
    use std::io::Cursor;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestRecord {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn write_document_produces_decodable_array() {
        let buffer = Cursor::new(Vec::new());
        let mut writer = ArchiveWriter::new(buffer);

        let records = [
            TestRecord {
                id: 1,
                name: "first".to_string(),
            },
            TestRecord {
                id: 2,
                name: "second".to_string(),
            },
        ];

        writer.write_document(&records).await.unwrap();
        writer.flush().await.unwrap();

        let data = writer.into_inner().into_inner().into_inner();
        let text = String::from_utf8(data).unwrap();

        let decoded: Vec<TestRecord> = decode_array(&text).unwrap();
        assert_eq!(decoded, records);
    }

    #[tokio::test]
    async fn write_document_is_pretty_printed() {
        let buffer = Cursor::new(Vec::new());
        let mut writer = ArchiveWriter::new(buffer);

        let records = [TestRecord {
            id: 1,
            name: "first".to_string(),
        }];

        writer.write_document(&records).await.unwrap();
        writer.flush().await.unwrap();

        let data = writer.into_inner().into_inner().into_inner();
        let text = String::from_utf8(data).unwrap();

        assert!(text.contains('\n'));
        assert!(text.ends_with('\n'));
        assert!(text.contains("  \"id\": 1"));
    }

    #[tokio::test]
    async fn write_empty_document() {
        let buffer = Cursor::new(Vec::new());
        let mut writer = ArchiveWriter::new(buffer);

        writer.write_document::<TestRecord>(&[]).await.unwrap();
        writer.flush().await.unwrap();

        let data = writer.into_inner().into_inner().into_inner();
        let text = String::from_utf8(data).unwrap();

        assert_eq!(text.trim(), "[]");
    }
}
