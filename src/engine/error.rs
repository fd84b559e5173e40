use chrono::{DateTime, Utc};
use thiserror::Error;
use ulid::Ulid;

use crate::model::BookingStatus;

/// Every way a booking or availability operation can fail. All variants
/// are detected synchronously and surfaced to the caller; none are retried
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("invalid date/time literal: {0:?}")]
    InvalidTimeFormat(String),

    #[error("start {start} must be before end {end}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("requested time does not align with a free slot")]
    SlotNotAvailable,

    #[error("booking starts in the past")]
    BookingInPast,

    #[error("booking must be made at least {required_minutes} minutes in advance (got {actual_minutes})")]
    BookingTooClose {
        required_minutes: i64,
        actual_minutes: i64,
    },

    #[error("booking duration {duration_minutes} minutes exceeds the maximum of {max_minutes}")]
    BookingExceedsMaxDuration {
        duration_minutes: i64,
        max_minutes: i64,
    },

    #[error("booking duration {duration_minutes} minutes is not a multiple of the {slot_minutes}-minute slot")]
    BookingInvalidDurationForSlot {
        duration_minutes: i64,
        slot_minutes: i64,
    },

    #[error("daily booking limit of {0} reached for this owner")]
    DailyBookingLimitExceeded(u32),

    #[error("daily booking limit of {0} reached for this client")]
    ClientDailyBookingLimitExceeded(u32),

    #[error("booking conflicts with existing booking {0}")]
    BookingOverlap(Ulid),

    #[error("booking not found: {0}")]
    BookingNotFound(Ulid),

    #[error("rule not found: {0}")]
    RuleNotFound(Ulid),

    #[error("exception not found: {0}")]
    ExceptionNotFound(Ulid),

    #[error("booking {id} is {status:?} and cannot transition to {requested:?}")]
    InvalidStatusTransition {
        id: Ulid,
        status: BookingStatus,
        requested: BookingStatus,
    },
}

impl BookingError {
    /// The 409-equivalent rejection: the slot was taken by a competing
    /// booking. Expected under concurrent load; callers may retry with a
    /// different slot. Everything else is a 4xx-style input or business
    /// rule rejection.
    pub fn is_conflict(&self) -> bool {
        matches!(self, BookingError::BookingOverlap(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BookingError::BookingNotFound(_)
                | BookingError::RuleNotFound(_)
                | BookingError::ExceptionNotFound(_)
        )
    }
}
