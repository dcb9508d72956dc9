//! QueryStorage trait implementation for in-memory storage.
//!
//! This module contains the async trait implementation that provides
//! the public API for the in-memory storage backend.

use super::{ordering, InMemoryStorage};
use crate::domain::{
    tags, NewQueryRecord, QueryFilter, QueryRecord, QueryRecordUpdate, RecordId, VersionId,
};
use crate::error::{Error, ImportError, Result};
use crate::storage::QueryStorage;
use async_trait::async_trait;

#[async_trait]
impl QueryStorage for InMemoryStorage {
    // ========== CRUD Operations ==========

    async fn create(&mut self, record: NewQueryRecord) -> Result<QueryRecord> {
        record.validate().map_err(Error::Validation)?;

        let mut inner = self.lock().await;

        let id = inner.next_record_id();
        let tags = tags::normalize_tags(&record.tags);
        let entry = inner.new_version_entry(
            1,
            record.name.clone(),
            record.query.clone(),
            record.documentation.clone(),
            tags.clone(),
        );

        let query_record = QueryRecord {
            id,
            name: record.name,
            query: record.query,
            documentation: record.documentation,
            tags,
            is_favorite: false,
            current_version: Some(entry.id),
            versions: vec![entry],
        };

        inner.records.insert(id, query_record.clone());

        tracing::debug!(record_id = %id, "Created query record");

        Ok(query_record)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<QueryRecord>> {
        let inner = self.lock().await;

        Ok(inner.records.get(id).cloned())
    }

    async fn update(&mut self, id: &RecordId, updates: QueryRecordUpdate) -> Result<QueryRecord> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;

        // Resolve the full candidate content before touching the record so
        // a validation failure leaves the collection unchanged.
        let candidate = NewQueryRecord {
            name: updates.name.unwrap_or_else(|| record.name.clone()),
            query: updates.query.unwrap_or_else(|| record.query.clone()),
            documentation: updates
                .documentation
                .unwrap_or_else(|| record.documentation.clone()),
            tags: match updates.tags {
                Some(new_tags) => tags::normalize_tags(&new_tags),
                None => record.tags.clone(),
            },
        };
        candidate.validate().map_err(Error::Validation)?;

        // A candidate identical to the current snapshot is a no-op: no
        // version entry is created.
        let unchanged = record.current_entry().is_some_and(|entry| {
            entry.content_matches(
                &candidate.name,
                &candidate.query,
                candidate.documentation.as_deref(),
                &candidate.tags,
            )
        });
        if unchanged {
            return Ok(record.clone());
        }

        let version = record.next_version_number();
        let entry = inner.new_version_entry(
            version,
            candidate.name,
            candidate.query,
            candidate.documentation,
            candidate.tags,
        );

        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;
        record.apply_version(entry);

        tracing::debug!(record_id = %id, version, "Appended new version");

        Ok(record.clone())
    }

    async fn delete(&mut self, id: &RecordId) -> Result<()> {
        let mut inner = self.lock().await;

        inner
            .records
            .remove(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;

        tracing::debug!(record_id = %id, "Deleted query record");

        Ok(())
    }

    // ========== History ==========

    async fn revert(&mut self, id: &RecordId, version_id: &VersionId) -> Result<QueryRecord> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;

        // Copy the target snapshot; history itself is never rewritten.
        let target = record
            .find_version(version_id)
            .ok_or_else(|| Error::VersionNotFound {
                record: *id,
                version: *version_id,
            })?
            .clone();

        let version = record.next_version_number();
        let entry = inner.new_version_entry(
            version,
            target.name,
            target.query,
            target.documentation,
            target.tags,
        );

        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;
        record.apply_version(entry);

        tracing::debug!(record_id = %id, version, restored = %version_id, "Reverted to historical version");

        Ok(record.clone())
    }

    // ========== Metadata Operations ==========

    async fn toggle_favorite(&mut self, id: &RecordId) -> Result<QueryRecord> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;

        record.is_favorite = !record.is_favorite;

        Ok(record.clone())
    }

    async fn add_tags(&mut self, id: &RecordId, raw_tags: &str) -> Result<QueryRecord> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;

        // Already-present tags are skipped; adding nothing new is not an
        // error.
        let additions = tags::parse_tag_input(raw_tags);
        tags::merge_tags(&mut record.tags, &additions);

        Ok(record.clone())
    }

    async fn remove_tag(&mut self, id: &RecordId, tag: &str) -> Result<QueryRecord> {
        let mut inner = self.lock().await;

        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| Error::RecordNotFound(*id))?;

        record.tags.retain(|t| t != tag);

        Ok(record.clone())
    }

    // ========== Queries ==========

    async fn search(&self, filter: &QueryFilter) -> Result<Vec<QueryRecord>> {
        let inner = self.lock().await;

        let mut results: Vec<QueryRecord> = inner
            .records
            .values()
            .filter(|record| {
                if filter.favorites_only && !record.is_favorite {
                    return false;
                }
                if let Some(tag) = &filter.tag {
                    if !record.has_tag(tag) {
                        return false;
                    }
                }
                match &filter.term {
                    Some(term) => record.matches_term(term),
                    None => true,
                }
            })
            .cloned()
            .collect();

        ordering::sort_by_creation(&mut results);
        if filter.favorites_first {
            ordering::favorites_first(&mut results);
        }
        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }

        Ok(results)
    }

    // ========== Batch Operations ==========

    async fn import_records(&mut self, records: Vec<QueryRecord>) -> Result<usize> {
        let mut inner = self.lock().await;

        // Validate every record before inserting any, so a bad payload
        // leaves the collection unchanged.
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|message| ImportError::Element { index, message })?;
        }

        let mut imported = 0;
        for mut record in records {
            // Imported ids are preserved unless they collide with a record
            // already in the collection.
            if inner.records.contains_key(&record.id) {
                let fresh = inner.next_record_id();
                tracing::warn!(
                    original_id = %record.id,
                    assigned_id = %fresh,
                    "Import id collision, assigned a fresh id"
                );
                record.id = fresh;
            }
            inner.register_record(&record);
            inner.records.insert(record.id, record);
            imported += 1;
        }

        tracing::debug!(imported, "Imported query records");

        Ok(imported)
    }

    async fn export_all(&self) -> Result<Vec<QueryRecord>> {
        let inner = self.lock().await;

        let mut records: Vec<QueryRecord> = inner.records.values().cloned().collect();
        ordering::sort_by_creation(&mut records);

        Ok(records)
    }

    // ========== Persistence ==========

    async fn save(&self) -> Result<()> {
        // No-op for in-memory storage. Archive persistence goes through
        // save_to_archive().
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // No-op for in-memory storage; there is no persistent state to
        // reload from.
        Ok(())
    }
}
