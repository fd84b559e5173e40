mod error;
mod guard;
mod interval;
mod mutations;
mod queries;
mod resolver;
mod slots;
mod validate;

pub use error::BookingError;
pub use guard::OwnerLocks;
pub use interval::{merge, subtract};
pub use resolver::{resolve, DayPlan, DaySource};
pub use slots::{covered_by_slots, generate_slots, slot_intervals};

use std::sync::Arc;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::store::{BookingStore, ExceptionStore, RuleStore};

/// The availability & booking engine.
///
/// Reads rules, exceptions, and bookings through the storage traits and
/// never mutates rules or exceptions. Bookings are written only from
/// inside the per-owner critical section, so concurrent creation requests
/// against the same owner cannot double-book; every read path is
/// lock-free and may observe a slightly stale snapshot — the authority on
/// conflict is the overlap check inside the critical section.
pub struct Engine {
    pub(crate) rules: Arc<dyn RuleStore>,
    pub(crate) exceptions: Arc<dyn ExceptionStore>,
    pub(crate) bookings: Arc<dyn BookingStore>,
    pub(crate) locks: OwnerLocks,
}

impl Engine {
    pub fn new(
        rules: Arc<dyn RuleStore>,
        exceptions: Arc<dyn ExceptionStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            rules,
            exceptions,
            bookings,
            locks: OwnerLocks::new(),
        }
    }

    /// Resolve the day's availability source and project it onto the date.
    pub(crate) async fn day_plan(&self, owner_id: Ulid, date: NaiveDate) -> Option<DayPlan> {
        resolver::resolve(self.rules.as_ref(), self.exceptions.as_ref(), owner_id, date)
            .await
            .into_plan(date)
    }

    /// Entries currently in the per-owner lock table.
    pub fn lock_table_len(&self) -> usize {
        self.locks.len()
    }

    /// Drop lock entries with no holder and no waiters.
    pub fn prune_locks(&self) {
        self.locks.prune();
    }
}
