//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:  green   (completed actions)
//!   - Warning:  yellow  (skipped records, favorite stars)
//!   - Error:    red     (failed operations)
//!   - Info:     cyan    (record ids, current-version markers)
//!   - Tags:     five-color palette keyed by tag hash
//!   - Muted:    dimmed  (field labels, version badges)
//!   - Emphasis: bold    (section headers)

use crate::domain::tags;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Colorize a record id (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Colorize a tag list, each tag keeping its stable palette color.
pub(crate) fn colorize_tags(tags: &[String], config: &OutputConfig) -> String {
    if tags.is_empty() {
        return String::new();
    }
    if !config.use_colors {
        return tags.join(", ");
    }
    let colored_tags: Vec<String> = tags.iter().map(|tag| colorize_tag(tag)).collect();
    colored_tags.join(", ")
}

/// Map a tag to its palette color via the stable tag hash.
fn colorize_tag(tag: &str) -> String {
    match tags::palette_index(tag) {
        0 => tag.blue().to_string(),
        1 => tag.green().to_string(),
        2 => tag.magenta().to_string(),
        3 => tag.yellow().to_string(),
        _ => tag.bright_magenta().to_string(),
    }
}

/// Get a colored favorite marker, with ASCII fallback support.
pub(crate) fn favorite_icon(is_favorite: bool, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        if is_favorite { "*" } else { "-" }
    } else if is_favorite {
        "★"
    } else {
        "☆"
    };

    if !config.use_colors {
        return icon.to_string();
    }

    if is_favorite {
        icon.yellow().to_string()
    } else {
        icon.dimmed().to_string()
    }
}

/// Format a version number as a dimmed badge ("v3").
pub(crate) fn version_badge(version: u32, config: &OutputConfig) -> String {
    let text = format!("v{version}");
    if !config.use_colors {
        return text;
    }
    text.dimmed().to_string()
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply cyan color to text (for arrows/markers).
pub(crate) fn cyan(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}
