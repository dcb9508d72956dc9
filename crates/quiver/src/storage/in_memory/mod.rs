//! In-memory storage backend using a HashMap keyed by record id.
//!
//! This module provides a fast, **ephemeral** storage implementation where all data
//! is held in RAM and **lost when the process exits**. It is suitable for:
//!
//! - Testing and development
//! - Short-lived CLI sessions
//! - Backing the archive file storage
//!
//! # Persistence
//!
//! This backend supports **optional archive persistence** via the `load_from_archive()`
//! and `save_to_archive()` functions. Data can be loaded from and saved to a JSON
//! array document on disk while maintaining fast in-memory operations.
//!
//! - **In-memory only**: Use `new_in_memory_storage()` for ephemeral storage
//! - **With persistence**: Use `load_from_archive()` to load from disk, then
//!   call `save_to_archive()` after mutations to persist changes
//!
//! The trait's `save()` method is a no-op for in-memory storage. Use `save_to_archive()`
//! directly for file-based persistence.
//!
//! # Architecture
//!
//! The implementation uses:
//! - `HashMap<RecordId, QueryRecord>` for O(1) record lookups
//! - A watermark-based id generator issuing millisecond-timestamp ids for
//!   both records and version entries
//!
//! Creation order is recovered from the ids themselves: record ids are
//! creation-time timestamps, so sorting by id sorts by creation.
//!
//! # Thread Safety
//!
//! The storage is wrapped in `Arc<Mutex<InMemoryStorageInner>>` to provide thread-safe
//! access in async contexts. All operations acquire the mutex lock, ensuring safe
//! concurrent access from multiple tasks.
//!
//! # Performance Characteristics
//!
//! - Create: O(1)
//! - Read: O(1) for single record lookups
//! - Update: O(v) where v is the number of versions (snapshot comparison)
//! - Delete: O(1)
//! - Search: O(n) over records, with an O(n log n) creation-order sort

mod archive;
mod inner;
mod ordering;
mod trait_impl;

use crate::storage::QueryStorage;
use inner::InMemoryStorageInner;
use std::sync::Arc;
use tokio::sync::Mutex;

// Re-export public API
pub use archive::{load_from_archive, save_to_archive, LoadWarning};

/// Thread-safe in-memory storage.
///
/// This type alias wraps the inner storage in `Arc<Mutex<>>` for thread-safe
/// async access. It implements [`QueryStorage`] via the trait implementation
/// in `trait_impl.rs`.
pub(crate) type InMemoryStorage = Arc<Mutex<InMemoryStorageInner>>;

/// Create a new in-memory storage instance.
///
/// # Example
///
/// ```
/// use quiver::storage::in_memory::new_in_memory_storage;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let storage = new_in_memory_storage();
///     // Use storage...
/// }
/// ```
#[must_use]
pub fn new_in_memory_storage() -> Box<dyn QueryStorage> {
    Box::new(Arc::new(Mutex::new(InMemoryStorageInner::new())))
}
