//! Reading and writing of JSON array documents.
//!
//! An archive document is a single JSON file whose top-level value is an
//! array of records. This library provides strict and resilient decoding
//! of such documents, atomic whole-document writes, and buffered async
//! reader/writer wrappers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod document;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_array_atomic, write_array_atomic_iter};
pub use document::{
    decode_array, decode_array_resilient, encode_array_pretty, read_array_document,
    read_array_document_resilient,
};
pub use error::{Error, Result};
pub use reader::ArchiveReader;
pub use warning::Warning;
pub use writer::ArchiveWriter;
