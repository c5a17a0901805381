//! Bounded counting resource of available chairs.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::GameError;

/// Available chairs for the current round.
///
/// Claims are lock-free compare-and-swap decrements, so any number of players
/// may race on [`ChairPool::try_claim`]; only the coordinator resets the pool.
/// The permit count never exceeds `capacity`.
#[derive(Debug)]
pub struct ChairPool {
    permits: AtomicUsize,
    capacity: usize,
}

impl ChairPool {
    /// A full pool with `capacity` permits.
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: AtomicUsize::new(capacity),
            capacity,
        }
    }

    /// Discard leftover permits and set the count to exactly `new_count`.
    ///
    /// Single writer: only the coordinator calls this, before the race starts.
    /// Returns the number of permits that were discarded.
    pub fn resize_and_refill(&self, new_count: usize) -> Result<usize, GameError> {
        if new_count > self.capacity {
            return Err(GameError::PoolOverflow {
                requested: new_count,
                capacity: self.capacity,
            });
        }

        let drained = self.permits.swap(new_count, Ordering::AcqRel);
        debug!(drained, permits = new_count, "Chair pool refilled");
        Ok(drained)
    }

    /// Take one chair if any is available. Never blocks.
    pub fn try_claim(&self) -> bool {
        self.permits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| p.checked_sub(1))
            .is_ok()
    }

    /// Add up to `n` permits, saturating at capacity. Returns how many were added.
    pub fn release_all(&self, n: usize) -> usize {
        let capacity = self.capacity;
        let before = self
            .permits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| {
                Some(p.saturating_add(n).min(capacity))
            })
            .unwrap_or_else(|p| p);
        before.saturating_add(n).min(capacity) - before
    }

    /// Permits left right now. Racy by nature; use for logging and tests.
    pub fn available(&self) -> usize {
        self.permits.load(Ordering::Acquire)
    }

    /// The most permits the pool can hold (`players - 1`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
