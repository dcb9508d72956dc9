//! Tag parsing, merging, and deterministic color assignment.
//!
//! Tags are short free-form strings. User input arrives as a single
//! comma-separated string; parsing trims each piece, drops empties, and
//! deduplicates case-sensitively while preserving first-seen order.

/// Number of colors in the tag display palette.
pub const PALETTE_SIZE: usize = 5;

/// Parses raw comma-separated tag input into a normalized tag list.
///
/// Splits on commas, trims whitespace, discards empty pieces, and removes
/// duplicates (case-sensitive, first occurrence wins).
///
/// # Examples
///
/// ```
/// use quiver::domain::tags::parse_tag_input;
///
/// let tags = parse_tag_input("auth, , detection, auth");
/// assert_eq!(tags, vec!["auth", "detection"]);
/// ```
#[must_use]
pub fn parse_tag_input(raw: &str) -> Vec<String> {
    let pieces: Vec<String> = raw.split(',').map(str::to_string).collect();
    normalize_tags(&pieces)
}

/// Normalizes a tag list: trims entries, drops empties, deduplicates.
///
/// Case-sensitive; order of first occurrence is preserved.
#[must_use]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

/// Merges new tags into an existing tag list, skipping exact duplicates.
///
/// Returns the number of tags actually added. Existing order is preserved
/// and additions keep their relative order.
pub fn merge_tags(existing: &mut Vec<String>, additions: &[String]) -> usize {
    let mut added = 0;
    for tag in additions {
        if !existing.iter().any(|t| t == tag) {
            existing.push(tag.clone());
            added += 1;
        }
    }
    added
}

/// Maps a tag to a stable palette index.
///
/// Deterministic: the same tag always maps to the same index, so a tag
/// keeps its color across renders and sessions. The hash has no other
/// guarantee and is not correctness-relevant.
#[must_use]
pub fn palette_index(tag: &str) -> usize {
    let mut hash: i32 = 0;
    for byte in tag.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(byte));
    }
    hash.unsigned_abs() as usize % PALETTE_SIZE
}
