//! JSON serialization for programmatic output.
//!
//! All functions write pretty-printed JSON followed by a newline so the
//! output is pipe-friendly for `jq` and similar tools. Records serialize
//! with their full version history embedded.

use crate::domain::{QueryRecord, VersionEntry};
use serde::Serialize;
use std::io::{self, Write};

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{}", json)
}

/// Print a single record as JSON, history included.
pub(super) fn print_record_json<W: Write>(w: &mut W, record: &QueryRecord) -> io::Result<()> {
    write_json(w, record)
}

/// Print a list of records as a JSON array.
pub(super) fn print_records_json<W: Write>(w: &mut W, records: &[QueryRecord]) -> io::Result<()> {
    write_json(w, &records)
}

/// Print one historical version's snapshot as JSON.
pub(super) fn print_version_json<W: Write>(
    w: &mut W,
    record: &QueryRecord,
    entry: &VersionEntry,
) -> io::Result<()> {
    write_json(
        w,
        &serde_json::json!({
            "recordId": record.id,
            "version": entry,
        }),
    )
}

/// Print a record's version history as JSON.
pub(super) fn print_history_json<W: Write>(w: &mut W, record: &QueryRecord) -> io::Result<()> {
    write_json(
        w,
        &serde_json::json!({
            "id": record.id,
            "name": record.name,
            "currentVersion": record.current_version,
            "versions": record.versions,
        }),
    )
}
