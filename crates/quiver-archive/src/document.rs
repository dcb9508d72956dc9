//! Decoding and encoding of whole archive documents.
//!
//! An archive document is one JSON array of records. Documents are always
//! parsed in full: a JSON array cannot be decoded incrementally without a
//! streaming parser, and archive files are small enough that whole-document
//! parsing is the simpler and faster option.
//!
//! Two decode modes are provided:
//!
//! - **Strict** ([`decode_array`], [`read_array_document`]): the first
//!   malformed element fails the whole decode. Used for imports, where a
//!   partially-applied payload would be worse than a clean failure.
//! - **Resilient** ([`decode_array_resilient`],
//!   [`read_array_document_resilient`]): malformed elements are skipped and
//!   reported as [`Warning`]s. Used for loading the data file, where one bad
//!   record must not make the rest of the collection unreachable.

use crate::error::{Error, Result};
use crate::warning::Warning;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// Strictly decodes a JSON array document from a string.
///
/// The top-level value must be a JSON array. Every element must decode
/// into `T`; the first element that does not fails the whole decode with
/// [`Error::Element`], carrying the element's index.
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not valid JSON,
/// [`Error::InvalidFormat`] if the top-level value is not an array, and
/// [`Error::Element`] if any element fails to decode.
///
/// # Examples
///
/// ```
/// use quiver_archive::decode_array;
///
/// let records: Vec<u32> = decode_array("[1, 2, 3]").unwrap();
/// assert_eq!(records, vec![1, 2, 3]);
///
/// let err = decode_array::<u32>("{\"not\": \"an array\"}").unwrap_err();
/// assert!(err.to_string().contains("Invalid archive document"));
/// ```
pub fn decode_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let elements = parse_top_level_array(text)?;

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let record =
            serde_json::from_value(element).map_err(|source| Error::Element { index, source })?;
        records.push(record);
    }

    Ok(records)
}

/// Resiliently decodes a JSON array document from a string.
///
/// The top-level value must still be a JSON array (a document that is not
/// an array is a hard error, not a warning), but elements that fail to
/// decode into `T` are skipped and reported as [`Warning::MalformedElement`]
/// instead of failing the decode.
///
/// A string that is empty or whitespace-only decodes to an empty collection
/// with no warnings, so a freshly created data file loads cleanly.
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not valid JSON and
/// [`Error::InvalidFormat`] if the top-level value is not an array.
pub fn decode_array_resilient<T: DeserializeOwned>(text: &str) -> Result<(Vec<T>, Vec<Warning>)> {
    if text.trim().is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let elements = parse_top_level_array(text)?;

    let mut records = Vec::with_capacity(elements.len());
    let mut warnings = Vec::new();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(record) => records.push(record),
            Err(e) => warnings.push(Warning::MalformedElement {
                index,
                error: e.to_string(),
            }),
        }
    }

    Ok((records, warnings))
}

/// Encodes a slice of records as a pretty-printed JSON array document.
///
/// The output ends with a trailing newline so the document diffs cleanly
/// under version control.
///
/// # Errors
///
/// Returns [`Error::Json`] if any record fails to serialize.
pub fn encode_array_pretty<T: Serialize>(values: &[T]) -> Result<String> {
    let mut text = serde_json::to_string_pretty(values)?;
    text.push('\n');
    Ok(text)
}

/// Strictly reads and decodes a JSON array document from a file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, plus the decode
/// errors described on [`decode_array`].
pub async fn read_array_document<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    decode_array(&text)
}

/// Resiliently reads and decodes a JSON array document from a file.
///
/// Malformed elements are skipped and reported as warnings; see
/// [`decode_array_resilient`].
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, [`Error::Json`] if
/// the content is not valid JSON, and [`Error::InvalidFormat`] if the
/// top-level value is not an array.
pub async fn read_array_document_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    let (records, warnings) = decode_array_resilient(&text)?;

    tracing::debug!(
        path = %path.display(),
        loaded = records.len(),
        skipped = warnings.len(),
        "Loaded archive document"
    );

    Ok((records, warnings))
}

/// Parses the text as JSON and extracts the top-level array.
fn parse_top_level_array(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(elements) => Ok(elements),
        other => Err(Error::InvalidFormat(format!(
            "expected a JSON array at the top level, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Returns the JSON type name for an unexpected top-level value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
