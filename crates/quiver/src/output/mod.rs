//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, tag palette)
//! - [`json`]: JSON serialization for programmatic output

pub mod color;
mod json;

use crate::domain::{QueryRecord, VersionEntry};
use colored::Colorize;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{bold, colorize_id, colorize_tags, cyan, dimmed, favorite_icon, version_badge};
use json::{print_history_json, print_record_json, print_records_json, print_version_json};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `QUIVER_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `QUIVER_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `QUIVER_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Factored out of [`from_env`](Self::from_env) so tests can inject
    /// variables without mutating the process environment.
    fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_width = match get("QUIVER_MAX_WIDTH") {
            Some(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "QUIVER_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match get("QUIVER_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "QUIVER_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        // Also support QUIVER_COLOR for explicit control
        let use_colors = get("NO_COLOR").is_none()
            && get("QUIVER_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

// ============================================================================
// Terminal Width Detection
// ============================================================================

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

// ============================================================================
// Section Printing Helpers
// ============================================================================

/// Print a text section with a bold title and wrapped, indented content.
fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    if config.use_colors {
        writeln!(w, "{}:", title.bold())?;
    } else {
        writeln!(w, "{}:", title)?;
    }
    for line in wrap_text(content, width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

/// Print an optional text section (only if Some and non-empty).
fn print_optional_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &Option<String>,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if let Some(text) = content {
        print_text_section(w, title, text, width, config)?;
    }
    Ok(())
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a record as a one-line summary in the specified format.
pub fn print_record(record: &QueryRecord, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_record_text(&mut handle, record, &config),
        OutputMode::Json => print_record_json(&mut handle, record),
    }
}

/// Print a list of records in the specified format.
pub fn print_records(records: &[QueryRecord], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_records_text(&mut handle, records, &config),
        OutputMode::Json => print_records_json(&mut handle, records),
    }
}

/// Print a record with full details (for the show command).
///
/// In JSON mode the record serializes whole, version history included, so
/// there is no separate details shape.
pub fn print_record_details(record: &QueryRecord, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_record_details_text(&mut handle, record, &config),
        OutputMode::Json => print_record_json(&mut handle, record),
    }
}

/// Print one historical version's snapshot (for `show --version`).
pub fn print_version_details(
    record: &QueryRecord,
    entry: &VersionEntry,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_version_details_text(&mut handle, record, entry, &config),
        OutputMode::Json => print_version_json(&mut handle, record, entry),
    }
}

/// Print a record's version history in the specified format.
pub fn print_history(record: &QueryRecord, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_history_text(&mut handle, record, &config),
        OutputMode::Json => print_history_json(&mut handle, record),
    }
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", msg)
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{}", json)
}

// ============================================================================
// Text Formatting
// ============================================================================

fn print_record_text<W: Write>(
    w: &mut W,
    record: &QueryRecord,
    config: &OutputConfig,
) -> io::Result<()> {
    let version = record.current_entry().map_or(0, |entry| entry.version);
    writeln!(
        w,
        "{} {}  {}  {}",
        favorite_icon(record.is_favorite, config),
        colorize_id(&record.id.to_string(), config),
        version_badge(version, config),
        record.name
    )?;

    if !record.tags.is_empty() {
        writeln!(
            w,
            "  {} {}",
            dimmed("Tags:", config),
            colorize_tags(&record.tags, config)
        )?;
    }

    Ok(())
}

fn print_records_text<W: Write>(
    w: &mut W,
    records: &[QueryRecord],
    config: &OutputConfig,
) -> io::Result<()> {
    if records.is_empty() {
        writeln!(w, "No records found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} record(s):", records.len())?;
    writeln!(w)?;

    for record in records {
        print_record_text(w, record, config)?;
    }

    Ok(())
}

fn print_record_details_text<W: Write>(
    w: &mut W,
    record: &QueryRecord,
    config: &OutputConfig,
) -> io::Result<()> {
    let terminal_width = get_terminal_width();
    let content_width = terminal_width.min(config.max_width);

    // Header: favorite marker, ID, and name
    writeln!(
        w,
        "{} {}: {}",
        favorite_icon(record.is_favorite, config),
        colorize_id(&record.id.to_string(), config),
        record.name
    )?;

    // Version metadata line
    if let Some(entry) = record.current_entry() {
        writeln!(
            w,
            "{}  {} ({})",
            dimmed("Version:", config),
            version_badge(entry.version, config),
            entry.id
        )?;
    }

    if !record.tags.is_empty() {
        writeln!(
            w,
            "{} {}",
            dimmed("Tags:", config),
            colorize_tags(&record.tags, config)
        )?;
    }

    // Timestamps come from the history: the first entry is creation time,
    // the current entry is the latest content change.
    if let (Some(first), Some(current)) = (record.versions.first(), record.current_entry()) {
        writeln!(
            w,
            "{} {}    {} {}",
            dimmed("Created:", config),
            first.timestamp.format("%Y-%m-%d %H:%M"),
            dimmed("Updated:", config),
            current.timestamp.format("%Y-%m-%d %H:%M")
        )?;
    }

    writeln!(
        w,
        "{} {} version(s)",
        dimmed("History:", config),
        record.versions.len()
    )?;

    // Long-form content sections
    print_text_section(w, "Query", &record.query, content_width, config)?;
    print_optional_section(
        w,
        "Documentation",
        &record.documentation,
        content_width,
        config,
    )?;

    Ok(())
}

fn print_version_details_text<W: Write>(
    w: &mut W,
    record: &QueryRecord,
    entry: &VersionEntry,
    config: &OutputConfig,
) -> io::Result<()> {
    let terminal_width = get_terminal_width();
    let content_width = terminal_width.min(config.max_width);
    let is_current = record.current_version == Some(entry.id);

    writeln!(
        w,
        "{} {} of {}: {}{}",
        version_badge(entry.version, config),
        entry.id,
        colorize_id(&record.id.to_string(), config),
        entry.name,
        if is_current { " (current)" } else { "" }
    )?;
    writeln!(
        w,
        "{} {}",
        dimmed("Saved:", config),
        entry.timestamp.format("%Y-%m-%d %H:%M")
    )?;

    if !entry.tags.is_empty() {
        writeln!(
            w,
            "{} {}",
            dimmed("Tags:", config),
            colorize_tags(&entry.tags, config)
        )?;
    }

    print_text_section(w, "Query", &entry.query, content_width, config)?;
    print_optional_section(
        w,
        "Documentation",
        &entry.documentation,
        content_width,
        config,
    )?;

    Ok(())
}

fn print_history_text<W: Write>(
    w: &mut W,
    record: &QueryRecord,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}: {}",
        bold("Version history for", config),
        colorize_id(&record.id.to_string(), config),
        record.name
    )?;

    if record.versions.is_empty() {
        writeln!(w)?;
        writeln!(w, "No versions recorded.")?;
        return Ok(());
    }

    writeln!(w)?;

    let marker = if config.use_ascii { ">" } else { "→" };
    for entry in &record.versions {
        let is_current = record.current_version == Some(entry.id);
        let prefix = if is_current {
            cyan(marker, config)
        } else {
            " ".to_string()
        };
        writeln!(
            w,
            "{} {}  {}  {}  {}",
            prefix,
            version_badge(entry.version, config),
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.name
        )?;
    }

    Ok(())
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(|s| s.into_owned())
                    .collect()
            }
        })
        .collect()
}
