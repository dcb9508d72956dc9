//! Import payload parsing.
//!
//! Import is strict where loading is lenient: a payload that is not valid
//! JSON, not an array, or contains a malformed element is rejected whole,
//! so a bad import never half-applies. The decode itself is the archive
//! crate's strict array decode; this module maps its errors onto
//! [`ImportError`].

use crate::domain::QueryRecord;
use crate::error::ImportError;

/// Parse an import payload into records.
///
/// The payload must be a JSON array of record objects. Semantic validation
/// (non-empty name/query, version references) happens later in storage,
/// before anything is inserted.
///
/// # Errors
///
/// - [`ImportError::InvalidJson`] if the text is not JSON at all
/// - [`ImportError::NotAnArray`] if the top-level value is not an array
/// - [`ImportError::Element`] for the first element that fails to decode
pub fn parse_import_payload(text: &str) -> Result<Vec<QueryRecord>, ImportError> {
    quiver_archive::decode_array(text).map_err(import_error)
}

fn import_error(e: quiver_archive::Error) -> ImportError {
    match e {
        quiver_archive::Error::InvalidFormat(found) => ImportError::NotAnArray(found),
        quiver_archive::Error::Element { index, source } => ImportError::Element {
            index,
            message: source.to_string(),
        },
        quiver_archive::Error::Json(e) => ImportError::InvalidJson(e.to_string()),
        // Unreachable for in-memory decoding; kept total for the enum.
        quiver_archive::Error::Io(e) => ImportError::InvalidJson(e.to_string()),
    }
}
