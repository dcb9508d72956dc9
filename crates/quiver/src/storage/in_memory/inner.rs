//! Core in-memory storage data structures.
//!
//! This module contains the inner storage structure that holds all data
//! and is wrapped in `Arc<Mutex<>>` for thread safety.

use crate::domain::{QueryRecord, RecordId, VersionEntry, VersionId};
use crate::id_generation::IdGenerator;
use chrono::Utc;
use std::collections::HashMap;

/// Inner storage structure (not thread-safe).
///
/// This contains the actual data structures for storing query records.
/// It's wrapped in `Arc<Mutex<>>` for thread safety.
///
/// # Id Discipline
///
/// Record ids and version-entry ids are drawn from the same generator, so
/// they never collide with each other. Every id present in the collection
/// must be registered with the generator; `register_record` does this for
/// records arriving from import or archive load.
pub(crate) struct InMemoryStorageInner {
    /// Records indexed by id for O(1) lookups
    pub(super) records: HashMap<RecordId, QueryRecord>,

    /// Id generator for new records and version entries
    pub(super) id_generator: IdGenerator,
}

impl InMemoryStorageInner {
    /// Create a new empty storage instance
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            id_generator: IdGenerator::new(),
        }
    }

    /// Generate a new unique id for a record
    pub(super) fn next_record_id(&mut self) -> RecordId {
        RecordId::new(self.id_generator.next_id())
    }

    /// Build a version entry stamped with a fresh id and the current time
    pub(super) fn new_version_entry(
        &mut self,
        version: u32,
        name: String,
        query: String,
        documentation: Option<String>,
        tags: Vec<String>,
    ) -> VersionEntry {
        VersionEntry {
            id: VersionId::new(self.id_generator.next_id()),
            version,
            name,
            query,
            documentation,
            tags,
            timestamp: Utc::now(),
        }
    }

    /// Register a record's id and all of its version ids with the generator
    /// so future ids never collide with them.
    pub(super) fn register_record(&mut self, record: &QueryRecord) {
        self.id_generator.register_id(record.id.value());
        for entry in &record.versions {
            self.id_generator.register_id(entry.id.value());
        }
    }
}
