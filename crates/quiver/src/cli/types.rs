//! Shared CLI result types.
//!
//! Batch commands (show, favorite, delete) process each record
//! independently and report both the successes and the failures in one
//! structured result, so a bad id in the middle of a batch doesn't hide
//! what the rest of the batch did.

use serde::Serialize;

use crate::domain::QueryRecord;

/// Result of a batch operation across multiple records.
///
/// Serializes cleanly for `--json` output; text output is rendered by the
/// command layer.
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    /// Records whose operation succeeded (and, for mutations, was saved).
    pub succeeded: Vec<QueryRecord>,

    /// Operations that failed, with the offending id and the error text.
    pub failed: Vec<BatchError>,
}

impl BatchResult {
    /// Create an empty batch result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of operations attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns true if any operation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// A single failed operation within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    /// The id the operation was attempted against, as the user typed it.
    pub record_id: String,

    /// Human-readable error description.
    pub error: String,
}
