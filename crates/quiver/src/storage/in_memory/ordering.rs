//! Ordering logic for record listings.
//!
//! Search results and exports are presented in creation order. Record ids
//! are creation-time timestamps, so ascending id is ascending creation
//! time and no separate ordering metadata is needed.

use crate::domain::QueryRecord;

/// Sort records into creation order (ascending id).
pub(super) fn sort_by_creation(records: &mut [QueryRecord]) {
    records.sort_by_key(|record| record.id);
}

/// Move favorites ahead of non-favorites.
///
/// The sort is stable, so the relative order within each group is
/// preserved.
pub(super) fn favorites_first(records: &mut [QueryRecord]) {
    records.sort_by_key(|record| !record.is_favorite);
}
