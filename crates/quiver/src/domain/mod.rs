//! Core domain types for the quiver saved-query store.
//!
//! This module defines the fundamental data structures: records, version
//! entries, and the parameter types used by storage operations.

pub mod tags;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a query record.
///
/// Record ids are creation-time millisecond timestamps, which makes them
/// unique within the collection and sortable by creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Creates a new record id from a raw millisecond timestamp.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// Unique identifier for a version entry.
///
/// Version ids use the same millisecond-timestamp scheme as record ids and
/// are unique within their record's version chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionId(pub i64);

impl VersionId {
    /// Creates a new version id from a raw millisecond timestamp.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for VersionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for VersionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// An immutable snapshot of a record's content at save time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionEntry {
    /// Unique identifier of this version entry.
    pub id: VersionId,

    /// Sequential version number, strictly increasing per record,
    /// starting at 1.
    pub version: u32,

    /// Record name at the time of the snapshot.
    pub name: String,

    /// Query body at the time of the snapshot.
    pub query: String,

    /// Free-text documentation at the time of the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Tags at the time of the snapshot.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation time of this snapshot.
    pub timestamp: DateTime<Utc>,
}

impl VersionEntry {
    /// Returns true if this snapshot's content equals the given fields.
    ///
    /// Compares name, query, documentation, and tags; id, version number,
    /// and timestamp are identity, not content.
    #[must_use]
    pub fn content_matches(
        &self,
        name: &str,
        query: &str,
        documentation: Option<&str>,
        tags: &[String],
    ) -> bool {
        self.name == name
            && self.query == query
            && self.documentation.as_deref() == documentation
            && self.tags == tags
    }
}

/// A saved named query with metadata and a linear version history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRecord {
    /// Unique identifier (creation-time millisecond timestamp).
    pub id: RecordId,

    /// Display label, non-empty once saved.
    pub name: String,

    /// The live query body, mirroring the current version's snapshot.
    pub query: String,

    /// Free-text documentation for the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Tags, duplicates removed, empty entries discarded.
    #[serde(default)]
    pub tags: Vec<String>,

    /// User-assigned favorite flag.
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: bool,

    /// Id of the version entry currently considered live. Null only for
    /// imported records that carried no history.
    #[serde(rename = "currentVersion", default)]
    pub current_version: Option<VersionId>,

    /// Append-only version history, oldest first.
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

impl QueryRecord {
    /// Returns the version entry referenced by `current_version`, if any.
    #[must_use]
    pub fn current_entry(&self) -> Option<&VersionEntry> {
        let current = self.current_version?;
        self.versions.iter().find(|v| v.id == current)
    }

    /// Looks up a version entry by id.
    #[must_use]
    pub fn find_version(&self, version_id: &VersionId) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == *version_id)
    }

    /// Returns the next version number for this record.
    ///
    /// One greater than the highest existing number, so the sequence stays
    /// strictly increasing even when imported history has gaps.
    #[must_use]
    pub fn next_version_number(&self) -> u32 {
        self.versions.iter().map(|v| v.version).max().unwrap_or(0) + 1
    }

    /// Case-insensitive substring match against name, query body,
    /// documentation, and any tag. An empty term matches everything.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.query.to_lowercase().contains(&needle)
            || self
                .documentation
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Returns true if the record carries the exact tag (case-sensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Appends a snapshot to the history and makes it current.
    ///
    /// The record-level name, query, documentation, and tags are set from
    /// the entry, so the record mirrors its newest snapshot.
    pub fn apply_version(&mut self, entry: VersionEntry) {
        self.name = entry.name.clone();
        self.query = entry.query.clone();
        self.documentation = entry.documentation.clone();
        self.tags = entry.tags.clone();
        self.current_version = Some(entry.id);
        self.versions.push(entry);
    }

    /// Checks structural validity of a stored or imported record.
    ///
    /// Tag drift between the record and its current snapshot is allowed
    /// (tag edits don't create versions), so the checks are the required
    /// fields, version-id uniqueness within the history, and the
    /// current-version reference.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.query.trim().is_empty() {
            return Err("query must not be empty".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &self.versions {
            if !seen.insert(entry.id) {
                return Err(format!(
                    "duplicate version id {} in the version history",
                    entry.id
                ));
            }
        }
        if let Some(current) = self.current_version {
            if self.find_version(&current).is_none() {
                return Err(format!(
                    "current version {current} is not in the version history"
                ));
            }
        }
        Ok(())
    }
}

/// Parameters for creating a new query record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueryRecord {
    /// Display label for the record.
    pub name: String,

    /// The query body.
    pub query: String,

    /// Optional free-text documentation.
    pub documentation: Option<String>,

    /// Initial tags; normalized (trimmed, deduplicated) before storage.
    pub tags: Vec<String>,
}

impl NewQueryRecord {
    /// Validates the required fields.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field if `name` or `query`
    /// is empty after trimming.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.query.trim().is_empty() {
            return Err("query must not be empty".to_string());
        }
        Ok(())
    }
}

/// A partial update to a query record.
///
/// `None` fields are left unchanged. `documentation` is doubly optional:
/// `Some(None)` clears it, `Some(Some(text))` replaces it.
#[derive(Debug, Clone, Default)]
pub struct QueryRecordUpdate {
    /// New display label.
    pub name: Option<String>,

    /// New query body.
    pub query: Option<String>,

    /// New documentation, or `Some(None)` to clear it.
    pub documentation: Option<Option<String>>,

    /// Replacement tag set; normalized before storage.
    pub tags: Option<Vec<String>>,
}

impl QueryRecordUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.query.is_none()
            && self.documentation.is_none()
            && self.tags.is_none()
    }
}

/// Filter and ordering options for listing and searching records.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    /// Case-insensitive substring to match against name, query,
    /// documentation, and tags. `None` or empty matches everything.
    pub term: Option<String>,

    /// Restrict results to favorites.
    pub favorites_only: bool,

    /// Partition favorites ahead of the rest, preserving creation order
    /// within each partition.
    pub favorites_first: bool,

    /// Restrict results to records carrying this exact tag.
    pub tag: Option<String>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,
}
