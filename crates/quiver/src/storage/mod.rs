//! Storage abstraction layer for quiver.
//!
//! This module provides the core storage trait and factory for creating
//! storage backends. It supports two implementations:
//!
//! - **In-memory**: Fast, ephemeral storage backed by a HashMap
//! - **Archive**: Persistent file-based storage using one JSON array
//!   document per collection
//!
//! # Architecture
//!
//! The storage layer uses an async trait so file-backed implementations can
//! share the interface with the in-memory one. The trait is object-safe,
//! allowing for dynamic dispatch via `Box<dyn QueryStorage>`.
//!
//! # Test Utilities
//!
//! This module provides a [`MockStorage`] implementation for testing code
//! that depends on the [`QueryStorage`] trait. To use it in your tests,
//! enable the `test-util` feature:
//!
//! ```toml
//! [dev-dependencies]
//! quiver = { version = "...", features = ["test-util"] }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use quiver::storage::{QueryStorage, StorageBackend, create_storage};
//! use quiver::domain::NewQueryRecord;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut storage = create_storage(StorageBackend::InMemory).await?;
//!
//!     let new_record = NewQueryRecord {
//!         name: "Failed logons".to_string(),
//!         query: "SecurityEvent | where EventID == 4625".to_string(),
//!         documentation: None,
//!         tags: vec!["auth".to_string(), "detection".to_string()],
//!     };
//!
//!     let record = storage.create(new_record).await?;
//!     println!("Created record: {}", record.id);
//!
//!     Ok(())
//! }
//! ```

use crate::domain::{
    NewQueryRecord, QueryFilter, QueryRecord, QueryRecordUpdate, RecordId, VersionId,
};
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// Storage backend implementations
pub mod in_memory;

/// Core storage trait for query record management.
///
/// This trait defines the interface for all storage backends.
/// Implementations must be `Send + Sync` to support use in async contexts.
///
/// # Method Categories
///
/// - **CRUD**: `create`, `get`, `update`, `delete`
/// - **History**: `revert`
/// - **Metadata**: `toggle_favorite`, `add_tags`, `remove_tag`
/// - **Queries**: `search`
/// - **Batch Operations**: `import_records`, `export_all`
/// - **Persistence**: `save`, `reload`
///
/// # Invariants
///
/// Implementations maintain, for every stored record:
///
/// - `versions` is append-only; entries are never reordered or rewritten
/// - `current_version` references an entry in `versions`
/// - version numbers are strictly increasing per record
/// - record-level name, query, documentation, and tags mirror the current
///   version's snapshot (tag operations update record tags only and do not
///   create versions)
#[async_trait]
pub trait QueryStorage: Send + Sync {
    // ========== CRUD Operations ==========

    /// Create a new query record.
    ///
    /// Generates a unique id and builds the first version entry as
    /// version 1, with `current_version` pointing at it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the name or query body is empty
    /// after trimming.
    async fn create(&mut self, record: NewQueryRecord) -> Result<QueryRecord>;

    /// Get a record by id.
    ///
    /// Returns `None` if the record doesn't exist.
    async fn get(&self, id: &RecordId) -> Result<Option<QueryRecord>>;

    /// Update an existing record.
    ///
    /// Only fields present in `updates` are modified. If the resulting
    /// content differs from the current version's snapshot, a new version
    /// entry is appended and becomes current; if nothing differs, the
    /// record is returned unchanged and no version is created.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` if the record doesn't exist, and
    /// `Error::Validation` if the update empties the name or query.
    async fn update(&mut self, id: &RecordId, updates: QueryRecordUpdate) -> Result<QueryRecord>;

    /// Delete a record and its whole version history.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` if the record doesn't exist.
    async fn delete(&mut self, id: &RecordId) -> Result<()>;

    // ========== History ==========

    /// Revert a record to a historical version.
    ///
    /// Appends a new version entry whose content is copied from the target
    /// version and makes it current. History is never rewritten: the target
    /// entry and everything after it stay in place.
    ///
    /// # Errors
    ///
    /// - `Error::RecordNotFound` if the record doesn't exist
    /// - `Error::VersionNotFound` if the record has no such version
    async fn revert(&mut self, id: &RecordId, version_id: &VersionId) -> Result<QueryRecord>;

    // ========== Metadata Operations ==========

    /// Flip a record's favorite flag.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` if the record doesn't exist.
    async fn toggle_favorite(&mut self, id: &RecordId) -> Result<QueryRecord>;

    /// Add tags from raw comma-separated input.
    ///
    /// The input is split on commas, trimmed, and empty pieces dropped;
    /// the remainder merges uniquely (case-sensitive) into the record's
    /// tags. Adding only already-present tags is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` if the record doesn't exist.
    async fn add_tags(&mut self, id: &RecordId, raw_tags: &str) -> Result<QueryRecord>;

    /// Remove one tag by exact (case-sensitive) match.
    ///
    /// Removing a tag the record doesn't carry is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordNotFound` if the record doesn't exist.
    async fn remove_tag(&mut self, id: &RecordId, tag: &str) -> Result<QueryRecord>;

    // ========== Queries ==========

    /// Search records matching the given filter.
    ///
    /// Results are in record-creation order (ascending id). The filter's
    /// `favorites_first` flag stably partitions favorites ahead of the
    /// rest without disturbing creation order within each partition.
    async fn search(&self, filter: &QueryFilter) -> Result<Vec<QueryRecord>>;

    // ========== Batch Operations ==========

    /// Import records, merging them into the existing collection.
    ///
    /// Records are appended, never replacing existing ones. Imported ids
    /// are preserved unless they collide with an id already present, in
    /// which case a fresh id is assigned. Returns the number of records
    /// imported.
    async fn import_records(&mut self, records: Vec<QueryRecord>) -> Result<usize>;

    /// Export all records in creation order.
    ///
    /// Suitable for archive export or backup.
    async fn export_all(&self) -> Result<Vec<QueryRecord>>;

    // ========== Persistence ==========

    /// Save the collection to persistent storage.
    ///
    /// Takes `&self` (not `&mut self`) so callers can save from shared
    /// references; implementations use interior mutability to support
    /// this. For the archive backend this writes the data file atomically.
    /// For pure in-memory storage this is a no-op.
    async fn save(&self) -> Result<()>;

    /// Reload state from persistent storage, discarding in-memory changes.
    ///
    /// Restores the storage to match the on-disk state. Used after a
    /// failed `save()` so in-memory state and the data file agree again.
    ///
    /// - **Archive backend**: re-reads the file and rebuilds state
    /// - **In-memory only**: no-op (there is no persistent state)
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be read or parsed.
    async fn reload(&mut self) -> Result<()>;
}

/// Storage backend configuration.
///
/// Determines which storage implementation to use.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// Archive file storage (persistent JSON array document)
    Archive(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    ///
    /// Returns `Some(path)` for the archive backend, `None` for in-memory.
    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Archive(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Wrapper that adds archive file persistence to any storage backend.
///
/// Holds the data file path and implements `save()` by writing the whole
/// collection to the archive document atomically.
struct ArchiveBackedStorage {
    inner: Box<dyn QueryStorage>,
    path: PathBuf,
}

impl ArchiveBackedStorage {
    /// Returns an immutable reference to the inner storage implementation.
    #[allow(dead_code)]
    pub(crate) fn inner(&self) -> &dyn QueryStorage {
        self.inner.as_ref()
    }
}

#[async_trait]
impl QueryStorage for ArchiveBackedStorage {
    async fn create(&mut self, record: NewQueryRecord) -> Result<QueryRecord> {
        self.inner.create(record).await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<QueryRecord>> {
        self.inner.get(id).await
    }

    async fn update(&mut self, id: &RecordId, updates: QueryRecordUpdate) -> Result<QueryRecord> {
        self.inner.update(id, updates).await
    }

    async fn delete(&mut self, id: &RecordId) -> Result<()> {
        self.inner.delete(id).await
    }

    async fn revert(&mut self, id: &RecordId, version_id: &VersionId) -> Result<QueryRecord> {
        self.inner.revert(id, version_id).await
    }

    async fn toggle_favorite(&mut self, id: &RecordId) -> Result<QueryRecord> {
        self.inner.toggle_favorite(id).await
    }

    async fn add_tags(&mut self, id: &RecordId, raw_tags: &str) -> Result<QueryRecord> {
        self.inner.add_tags(id, raw_tags).await
    }

    async fn remove_tag(&mut self, id: &RecordId, tag: &str) -> Result<QueryRecord> {
        self.inner.remove_tag(id, tag).await
    }

    async fn search(&self, filter: &QueryFilter) -> Result<Vec<QueryRecord>> {
        self.inner.search(filter).await
    }

    async fn import_records(&mut self, records: Vec<QueryRecord>) -> Result<usize> {
        self.inner.import_records(records).await
    }

    async fn export_all(&self) -> Result<Vec<QueryRecord>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_archive(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        // Reload from the archive file, replacing the inner storage
        if self.path.exists() {
            let (new_storage, warnings) = in_memory::load_from_archive(&self.path).await?;
            if !warnings.is_empty() {
                for warning in &warnings {
                    tracing::warn!(warning = ?warning, "Archive reload warning");
                }
            }
            self.inner = new_storage;
        } else {
            // File doesn't exist - reset to empty storage
            self.inner = in_memory::new_in_memory_storage();
        }
        Ok(())
    }
}

/// Create a storage instance for the given backend.
///
/// This factory function returns a trait object that can be used
/// polymorphically regardless of the backend implementation.
///
/// # Example
///
/// ```no_run
/// use quiver::storage::{create_storage, StorageBackend};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> anyhow::Result<()> {
///     let storage = create_storage(StorageBackend::InMemory).await?;
///     // Use storage...
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - `Error::Archive` if the archive backend's data file exists but cannot
///   be read or is not a JSON array document
pub async fn create_storage(backend: StorageBackend) -> Result<Box<dyn QueryStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage()),
        StorageBackend::Archive(path) => {
            // Archive backend uses InMemoryStorage with file persistence
            let inner = if path.exists() {
                let (storage, warnings) = in_memory::load_from_archive(&path).await?;
                if !warnings.is_empty() {
                    // Log warnings but continue - storage is still usable
                    for warning in &warnings {
                        tracing::warn!(warning = ?warning, "Archive load warning");
                    }
                }
                storage
            } else {
                // File doesn't exist yet (first run) - create empty storage
                in_memory::new_in_memory_storage()
            };
            // Wrap in ArchiveBackedStorage so save() writes to file
            Ok(Box::new(ArchiveBackedStorage { inner, path }))
        }
    }
}

// ========== Test Utilities ==========

/// The hardcoded record id returned by [`MockStorage`].
#[cfg(any(test, feature = "test-util"))]
pub const MOCK_RECORD_ID: i64 = 1_700_000_000_000;

/// Mock implementation of [`QueryStorage`] for testing.
///
/// This is a **stateless** mock that provides a minimal implementation of
/// the storage trait for verifying trait object usage. It always returns
/// hardcoded data for the record with [`MOCK_RECORD_ID`] but does not
/// persist anything between calls. Timestamps are generated fresh on each
/// call.
///
/// # Behavior
///
/// - `get`: returns `Some` only for [`MOCK_RECORD_ID`], `None` otherwise
/// - `search`, `export_all`: return empty vectors
/// - `save`, `reload`: no-ops
/// - Mutating methods: unimplemented (will panic if called)
///
/// # When to Use MockStorage vs In-Memory Storage
///
/// **Use `MockStorage` when** you only need to verify trait object
/// compilation and basic usage of code that accepts
/// `Box<dyn QueryStorage>`.
///
/// **Use [`in_memory::new_in_memory_storage`] when** you need actual CRUD
/// functionality, version history, or search behavior in tests.
#[cfg(any(test, feature = "test-util"))]
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct MockStorage;

#[cfg(any(test, feature = "test-util"))]
impl MockStorage {
    /// Create a new MockStorage instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates a test record with the given id.
    ///
    /// Useful for building expected values in downstream tests that need
    /// to match the shape returned by [`MockStorage`].
    #[must_use]
    pub fn create_test_record(id: RecordId) -> QueryRecord {
        use crate::domain::VersionEntry;
        use chrono::Utc;

        let version_id = VersionId::new(id.value() + 1);
        let entry = VersionEntry {
            id: version_id,
            version: 1,
            name: "Test query".to_string(),
            query: "Heartbeat | take 5".to_string(),
            documentation: None,
            tags: vec!["test".to_string()],
            timestamp: Utc::now(),
        };

        QueryRecord {
            id,
            name: entry.name.clone(),
            query: entry.query.clone(),
            documentation: None,
            tags: entry.tags.clone(),
            is_favorite: false,
            current_version: Some(version_id),
            versions: vec![entry],
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl QueryStorage for MockStorage {
    async fn create(&mut self, _record: NewQueryRecord) -> Result<QueryRecord> {
        Ok(Self::create_test_record(RecordId::new(MOCK_RECORD_ID)))
    }

    async fn get(&self, id: &RecordId) -> Result<Option<QueryRecord>> {
        if id.value() == MOCK_RECORD_ID {
            Ok(Some(Self::create_test_record(*id)))
        } else {
            Ok(None)
        }
    }

    async fn update(&mut self, _id: &RecordId, _updates: QueryRecordUpdate) -> Result<QueryRecord> {
        unimplemented!("MockStorage does not support update")
    }

    async fn delete(&mut self, _id: &RecordId) -> Result<()> {
        unimplemented!("MockStorage does not support delete")
    }

    async fn revert(&mut self, _id: &RecordId, _version_id: &VersionId) -> Result<QueryRecord> {
        unimplemented!("MockStorage does not support revert")
    }

    async fn toggle_favorite(&mut self, _id: &RecordId) -> Result<QueryRecord> {
        unimplemented!("MockStorage does not support toggle_favorite")
    }

    async fn add_tags(&mut self, _id: &RecordId, _raw_tags: &str) -> Result<QueryRecord> {
        unimplemented!("MockStorage does not support add_tags")
    }

    async fn remove_tag(&mut self, _id: &RecordId, _tag: &str) -> Result<QueryRecord> {
        unimplemented!("MockStorage does not support remove_tag")
    }

    async fn search(&self, _filter: &QueryFilter) -> Result<Vec<QueryRecord>> {
        Ok(vec![])
    }

    async fn import_records(&mut self, _records: Vec<QueryRecord>) -> Result<usize> {
        unimplemented!("MockStorage does not support import_records")
    }

    async fn export_all(&self) -> Result<Vec<QueryRecord>> {
        Ok(vec![])
    }

    async fn save(&self) -> Result<()> {
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}
