//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a record id.
///
/// Record ids are positive integers (creation-time millisecond timestamps),
/// e.g. `1700000000123`.
pub fn validate_record_id(s: &str) -> Result<String, String> {
    validate_numeric_id(s, "Record id")
}

/// Validate a version id.
///
/// Version ids use the same positive-integer scheme as record ids.
pub fn validate_version_id(s: &str) -> Result<String, String> {
    validate_numeric_id(s, "Version id")
}

fn validate_numeric_id(s: &str, field_name: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "Invalid {}: '{}'. Expected a positive integer (e.g. 1700000000123)",
            field_name.to_lowercase(),
            s
        ));
    }

    // Reject values that do not fit i64 (ids are stored as i64 timestamps)
    let value: i64 = s
        .parse()
        .map_err(|_| format!("{} '{}' is out of range", field_name, s))?;

    if value == 0 {
        return Err(format!("{} must be greater than zero", field_name));
    }

    Ok(s.to_string())
}

/// Validate a record name.
///
/// Names must be non-empty, single-line, and free of control characters.
pub fn validate_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if s.contains('\n') || s.contains('\r') {
        return Err("Name cannot contain newline characters".to_string());
    }

    // Check for control characters (0x00-0x1F except tab, and 0x7F-0x9F)
    // These can cause display issues and are likely user errors
    if let Some(pos) = s.chars().position(|c| {
        let code = c as u32;
        (code < 0x20 && code != 0x09) || (0x7F..=0x9F).contains(&code)
    }) {
        return Err(format!(
            "Name contains invalid control character at position {}",
            pos
        ));
    }

    Ok(s.to_string())
}

/// Validate a query body.
///
/// Queries are multi-line, so newlines are allowed; the body must still be
/// non-empty after trimming. Whitespace is preserved as entered.
pub fn validate_query(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Query cannot be empty".to_string());
    }

    validate_text_field(s, "Query")
}

/// Validate a documentation field.
///
/// Allows newlines but rejects control characters that could cause display
/// issues. Empty documentation is acceptable.
pub fn validate_documentation(s: &str) -> Result<String, String> {
    validate_text_field(s, "Documentation")
}

/// Validate multi-line text: newlines and tabs allowed, other control
/// characters rejected.
fn validate_text_field(s: &str, field_name: &str) -> Result<String, String> {
    if let Some(pos) = s.chars().position(|c| {
        let code = c as u32;
        // Control characters excluding tab (0x09), LF (0x0A), and CR (0x0D)
        (code < 0x20 && code != 0x09 && code != 0x0A && code != 0x0D)
            || (0x7F..=0x9F).contains(&code)
    }) {
        return Err(format!(
            "{} contains invalid control character at position {}",
            field_name, pos
        ));
    }

    Ok(s.to_string())
}
