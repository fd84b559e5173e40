//! Per-owner mutual exclusion for booking creation.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use ulid::Ulid;

/// Serializes the check-then-insert sequence of booking creation per owner.
///
/// Locks are keyed by owner id only; distinct owners never contend.
/// Waiters are admitted in FIFO arrival order and a caller that drops its
/// `acquire` future while waiting leaves the queue without blocking later
/// waiters. Release happens when the returned guard drops, so an error
/// path inside the critical section cannot leak the lock.
///
/// The table is process-local. Running several instances against shared
/// booking storage requires an external distributed lock in front of the
/// create path.
pub struct OwnerLocks {
    locks: DashMap<Ulid, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait until this owner's critical section is free, then enter it.
    pub async fn acquire(&self, owner_id: Ulid) -> OwnedMutexGuard<()> {
        // Clone the Arc out before awaiting: holding a map guard across an
        // await would block every acquire hashing to the same shard.
        let mutex = self.locks.entry(owner_id).or_default().value().clone();
        mutex.lock_owned().await
    }

    /// Drop entries with no holder and no waiters. The strong count is
    /// read under the shard lock, which `acquire` also needs to clone the
    /// Arc out, so no caller can be left holding a mutex this removed.
    pub fn prune(&self) {
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for OwnerLocks {
    fn default() -> Self {
        Self::new()
    }
}
