//! Storage seams. The engine reads rules, exceptions, and bookings through
//! these traits and writes bookings through [`BookingStore::insert`]; any
//! storage technology can sit behind them. The in-memory implementations
//! back the tests and small single-process deployments.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use ulid::Ulid;

use crate::engine::BookingError;
use crate::model::{
    AvailabilityException, AvailabilityRule, Booking, RuleSchedule,
};

#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Weekly rules for an owner on a weekday (0 = Sunday), active or not.
    async fn find_by_owner_and_weekday(&self, owner_id: Ulid, weekday: u8)
        -> Vec<AvailabilityRule>;

    /// Date-specific rules for an owner on one date, active or not.
    async fn find_by_owner_and_date(&self, owner_id: Ulid, date: NaiveDate)
        -> Vec<AvailabilityRule>;
}

#[async_trait]
pub trait ExceptionStore: Send + Sync {
    /// The at-most-one exception for an `(owner, date)` pair.
    async fn find_by_owner_and_date(
        &self,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> Option<AvailabilityException>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Confirmed bookings for an owner whose interval intersects
    /// `[range_start, range_end)`.
    async fn find_confirmed_in_range(
        &self,
        owner_id: Ulid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Vec<Booking>;

    /// Confirmed bookings for an owner starting on `date`.
    async fn count_confirmed_on(&self, owner_id: Ulid, date: NaiveDate) -> u32;

    /// Confirmed bookings by one client with one owner starting on `date`.
    async fn count_confirmed_by_client_on(
        &self,
        client_id: Ulid,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> u32;

    /// Persist a new booking. Must be called only from inside the owner's
    /// booking critical section.
    async fn insert(&self, booking: Booking) -> Booking;

    async fn find_by_id(&self, id: Ulid) -> Option<Booking>;

    async fn update(&self, booking: Booking) -> Result<Booking, BookingError>;
}

// ── In-memory implementations ────────────────────────────────────

/// Rules keyed by id. The administrative surface (insert/update/remove)
/// is for operators; the engine only reads.
pub struct InMemoryRuleStore {
    rules: DashMap<Ulid, AvailabilityRule>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
        }
    }

    pub fn insert(&self, rule: AvailabilityRule) {
        self.rules.insert(rule.id, rule);
    }

    pub fn update(&self, rule: AvailabilityRule) -> Result<(), BookingError> {
        if !self.rules.contains_key(&rule.id) {
            return Err(BookingError::RuleNotFound(rule.id));
        }
        self.rules.insert(rule.id, rule);
        Ok(())
    }

    pub fn remove(&self, id: Ulid) -> Result<AvailabilityRule, BookingError> {
        self.rules
            .remove(&id)
            .map(|(_, rule)| rule)
            .ok_or(BookingError::RuleNotFound(id))
    }

    fn matching<F>(&self, owner_id: Ulid, pred: F) -> Vec<AvailabilityRule>
    where
        F: Fn(&AvailabilityRule) -> bool,
    {
        let mut out: Vec<AvailabilityRule> = self
            .rules
            .iter()
            .filter(|e| e.owner_id == owner_id && pred(e.value()))
            .map(|e| e.value().clone())
            .collect();
        // Id order is creation order for ULIDs; keeps "first rule wins"
        // deterministic.
        out.sort_by_key(|r| r.id);
        out
    }
}

impl Default for InMemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn find_by_owner_and_weekday(
        &self,
        owner_id: Ulid,
        weekday: u8,
    ) -> Vec<AvailabilityRule> {
        self.matching(owner_id, |r| {
            matches!(r.schedule, RuleSchedule::Weekly { weekday: w } if w == weekday)
        })
    }

    async fn find_by_owner_and_date(
        &self,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> Vec<AvailabilityRule> {
        self.matching(owner_id, |r| {
            matches!(r.schedule, RuleSchedule::SpecificDate { date: d } if d == date)
        })
    }
}

/// Exceptions keyed by `(owner, date)` — the key itself enforces the
/// at-most-one invariant.
pub struct InMemoryExceptionStore {
    exceptions: DashMap<(Ulid, NaiveDate), AvailabilityException>,
}

impl InMemoryExceptionStore {
    pub fn new() -> Self {
        Self {
            exceptions: DashMap::new(),
        }
    }

    /// Insert or replace the exception for the pair.
    pub fn upsert(&self, exception: AvailabilityException) {
        self.exceptions
            .insert((exception.owner_id, exception.date), exception);
    }

    pub fn remove(
        &self,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> Result<AvailabilityException, BookingError> {
        self.exceptions
            .remove(&(owner_id, date))
            .map(|(_, e)| e)
            // The pair is the identity; report the owner whose day had
            // no exception.
            .ok_or(BookingError::ExceptionNotFound(owner_id))
    }
}

impl Default for InMemoryExceptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExceptionStore for InMemoryExceptionStore {
    async fn find_by_owner_and_date(
        &self,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> Option<AvailabilityException> {
        self.exceptions
            .get(&(owner_id, date))
            .map(|e| e.value().clone())
    }
}

pub struct InMemoryBookingStore {
    bookings: DashMap<Ulid, Booking>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_confirmed_in_range(
        &self,
        owner_id: Ulid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Vec<Booking> {
        let mut out: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|e| {
                e.owner_id == owner_id
                    && e.is_confirmed()
                    && e.start_at < range_end
                    && e.end_at > range_start
            })
            .map(|e| e.value().clone())
            .collect();
        out.sort_by_key(|b| b.start_at);
        out
    }

    async fn count_confirmed_on(&self, owner_id: Ulid, date: NaiveDate) -> u32 {
        self.bookings
            .iter()
            .filter(|e| {
                e.owner_id == owner_id && e.is_confirmed() && e.start_at.date_naive() == date
            })
            .count() as u32
    }

    async fn count_confirmed_by_client_on(
        &self,
        client_id: Ulid,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> u32 {
        self.bookings
            .iter()
            .filter(|e| {
                e.owner_id == owner_id
                    && e.client_id == client_id
                    && e.is_confirmed()
                    && e.start_at.date_naive() == date
            })
            .count() as u32
    }

    async fn insert(&self, booking: Booking) -> Booking {
        self.bookings.insert(booking.id, booking.clone());
        booking
    }

    async fn find_by_id(&self, id: Ulid) -> Option<Booking> {
        self.bookings.get(&id).map(|e| e.value().clone())
    }

    async fn update(&self, booking: Booking) -> Result<Booking, BookingError> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(BookingError::BookingNotFound(booking.id));
        }
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }
}
