//! Task id allocation.

use quickwin_core::TaskId;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, StoreError};

/// Monotonic id source owned by a store instance.
///
/// Tracks the last id handed out or observed; 0 means none yet.
#[derive(Debug)]
pub struct IdAllocator {
    last: AtomicU64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            last: AtomicU64::new(first.saturating_sub(1)),
        }
    }

    /// Hand out the next id. Never wraps: once `u64::MAX` is taken the
    /// allocator is exhausted.
    pub fn next_id(&self) -> Result<TaskId> {
        self.last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| last.checked_add(1))
            .map(|prev| TaskId(prev + 1))
            .map_err(|_| StoreError::IdsExhausted)
    }

    /// Make sure ids handed out later are greater than `id`.
    pub fn observe(&self, id: TaskId) {
        self.last.fetch_max(id.0, Ordering::Relaxed);
    }

    /// The id `next_id` would return, if any remain.
    pub fn peek(&self) -> Option<TaskId> {
        self.last.load(Ordering::Relaxed).checked_add(1).map(TaskId)
    }
}
