use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open interval `[start, end)` of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "interval start must be before end");
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Intervals touching at a single point do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `self` fully contains `other`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A bookable unit of availability: a wall-clock `HH:mm` pair on an
/// implicit date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: String,
    pub end: String,
}

/// When a rule recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSchedule {
    /// Every week on `weekday` (0 = Sunday .. 6 = Saturday).
    Weekly { weekday: u8 },
    /// On one calendar date only.
    SpecificDate { date: NaiveDate },
}

/// Booking constraints attached to a rule. All optional; an absent field
/// means the check is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    pub min_advance_minutes: Option<i64>,
    pub max_duration_minutes: Option<i64>,
    pub max_bookings_per_day: Option<u32>,
    pub max_bookings_per_client_per_day: Option<u32>,
}

/// An availability rule owned by one scheduling resource. Read-only to the
/// engine; administered out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: Ulid,
    pub owner_id: Ulid,
    pub schedule: RuleSchedule,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i64,
    pub is_active: bool,
    pub policy: BookingPolicy,
}

impl AvailabilityRule {
    /// Project the rule's wall-clock window onto a concrete date.
    pub fn interval_on(&self, date: NaiveDate) -> TimeInterval {
        TimeInterval::new(
            crate::timemath::at(date, self.start_time),
            crate::timemath::at(date, self.end_time),
        )
    }
}

/// How a date-specific exception alters the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExceptionKind {
    /// The day is fully closed, regardless of any rule.
    Block,
    /// The day's rules are replaced by this single window.
    Override {
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: i64,
    },
}

/// A one-off exception for a single `(owner, date)` pair. At most one per
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityException {
    pub id: Ulid,
    pub owner_id: Ulid,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    /// Only `Confirmed` bookings may transition; the other states are
    /// terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Confirmed)
    }
}

/// A reservation of one owner's time by one client. Only `Confirmed`
/// bookings occupy availability and count toward daily caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub owner_id: Ulid,
    pub client_id: Ulid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start_at, self.end_at)
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, BookingStatus::Confirmed)
    }
}
