//! Timestamp-based ID generation for quiver.
//!
//! Record and version ids are creation-time millisecond timestamps. A bare
//! clock read is not collision-free: two creations can land in the same
//! millisecond, and imported ids may sit ahead of the local clock. The
//! generator closes both gaps by never issuing a value at or below the
//! highest id it has seen.
//!
//! # Properties
//!
//! - **Strictly increasing**: every `next_id` call returns a value greater
//!   than all previously issued or registered ids.
//! - **Timestamp-shaped**: under normal clock conditions the value is the
//!   current Unix time in milliseconds, so ids double as creation times
//!   and sort in creation order.
//! - **Import-safe**: registering loaded or imported ids bumps the floor,
//!   so fresh ids never collide with preserved ones.
//!
//! # Example
//!
//! ```
//! use quiver::id_generation::IdGenerator;
//!
//! let mut generator = IdGenerator::new();
//!
//! let first = generator.next_id();
//! let second = generator.next_id();
//! assert!(second > first);
//! ```

use chrono::Utc;
use tracing::debug;

/// Monotonic millisecond-timestamp id generator.
///
/// One generator serves both record and version ids, which keeps ids
/// unique across the whole collection with a single watermark.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    /// Highest id issued or registered so far.
    last_issued: i64,
}

impl IdGenerator {
    /// Creates a generator with no issued ids.
    #[must_use]
    pub fn new() -> Self {
        Self { last_issued: 0 }
    }

    /// Registers an existing id so future ids are issued above it.
    ///
    /// Called for every id seen while loading the data file or importing
    /// records. Registering a value below the current watermark is a no-op.
    pub fn register_id(&mut self, id: i64) {
        if id > self.last_issued {
            self.last_issued = id;
        }
    }

    /// Returns the next unique id.
    ///
    /// The current wall clock in milliseconds, unless that would repeat or
    /// precede an already-issued id, in which case the watermark is bumped
    /// by one instead.
    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = if now > self.last_issued {
            now
        } else {
            debug!(
                now,
                last_issued = self.last_issued,
                "Clock at or behind watermark, issuing sequential id"
            );
            self.last_issued + 1
        };
        self.last_issued = id;
        id
    }

    /// Returns the highest id issued or registered so far.
    #[must_use]
    pub fn watermark(&self) -> i64 {
        self.last_issued
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
