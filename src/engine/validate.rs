//! Pure booking rule checks. Each check yields its own error kind; `now`
//! is always passed in so the checks stay deterministic under test.

use chrono::{DateTime, Utc};

use crate::model::{Booking, TimeInterval};

use super::error::BookingError;

pub fn validate_time_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), BookingError> {
    if start >= end {
        return Err(BookingError::InvalidTimeRange { start, end });
    }
    Ok(())
}

/// A booking may start exactly now, but not strictly in the past.
pub fn validate_not_in_past(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), BookingError> {
    if start < now {
        return Err(BookingError::BookingInPast);
    }
    Ok(())
}

pub fn validate_min_advance(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    min_advance_minutes: i64,
) -> Result<(), BookingError> {
    let actual_minutes = (start - now).num_minutes();
    if actual_minutes < min_advance_minutes {
        return Err(BookingError::BookingTooClose {
            required_minutes: min_advance_minutes,
            actual_minutes,
        });
    }
    Ok(())
}

pub fn validate_max_duration(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_minutes: i64,
) -> Result<(), BookingError> {
    let duration_minutes = (end - start).num_minutes();
    if duration_minutes > max_minutes {
        return Err(BookingError::BookingExceedsMaxDuration {
            duration_minutes,
            max_minutes,
        });
    }
    Ok(())
}

pub fn validate_slot_multiple(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    slot_minutes: i64,
) -> Result<(), BookingError> {
    let duration_minutes = (end - start).num_minutes();
    if duration_minutes % slot_minutes != 0 {
        return Err(BookingError::BookingInvalidDurationForSlot {
            duration_minutes,
            slot_minutes,
        });
    }
    Ok(())
}

pub fn validate_owner_daily_cap(confirmed_count: u32, cap: u32) -> Result<(), BookingError> {
    if confirmed_count >= cap {
        return Err(BookingError::DailyBookingLimitExceeded(cap));
    }
    Ok(())
}

pub fn validate_client_daily_cap(confirmed_count: u32, cap: u32) -> Result<(), BookingError> {
    if confirmed_count >= cap {
        return Err(BookingError::ClientDailyBookingLimitExceeded(cap));
    }
    Ok(())
}

/// The double-booking authority: no confirmed booking may overlap the
/// request. Runs inside the owner's critical section.
pub fn check_no_overlap(
    existing: &[Booking],
    request: &TimeInterval,
) -> Result<(), BookingError> {
    for booking in existing {
        if booking.is_confirmed() && booking.interval().overlaps(request) {
            return Err(BookingError::BookingOverlap(booking.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookingStatus;
    use crate::timemath;
    use ulid::Ulid;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        timemath::parse_date_time("2026-03-02", &format!("{h:02}:{m:02}")).unwrap()
    }

    fn booking(status: BookingStatus, sh: u32, eh: u32) -> Booking {
        Booking {
            id: Ulid::new(),
            owner_id: Ulid::new(),
            client_id: Ulid::new(),
            start_at: t(sh, 0),
            end_at: t(eh, 0),
            status,
        }
    }

    #[test]
    fn time_range_rejects_inverted_and_empty() {
        assert!(validate_time_range(t(9, 0), t(10, 0)).is_ok());
        assert!(matches!(
            validate_time_range(t(10, 0), t(9, 0)),
            Err(BookingError::InvalidTimeRange { .. })
        ));
        assert!(validate_time_range(t(9, 0), t(9, 0)).is_err());
    }

    #[test]
    fn past_check_allows_exactly_now() {
        let now = t(12, 0);
        assert!(validate_not_in_past(t(12, 0), now).is_ok());
        assert!(validate_not_in_past(t(12, 1), now).is_ok());
        assert!(matches!(
            validate_not_in_past(t(11, 59), now),
            Err(BookingError::BookingInPast)
        ));
    }

    #[test]
    fn min_advance_boundary() {
        let now = t(9, 0);
        assert!(validate_min_advance(t(10, 0), now, 60).is_ok());
        assert!(matches!(
            validate_min_advance(t(9, 59), now, 60),
            Err(BookingError::BookingTooClose {
                required_minutes: 60,
                actual_minutes: 59,
            })
        ));
    }

    #[test]
    fn max_duration_boundary() {
        assert!(validate_max_duration(t(9, 0), t(11, 0), 120).is_ok());
        assert!(matches!(
            validate_max_duration(t(9, 0), t(11, 1), 120),
            Err(BookingError::BookingExceedsMaxDuration {
                duration_minutes: 121,
                max_minutes: 120,
            })
        ));
    }

    #[test]
    fn slot_multiple_rejects_arbitrary_durations() {
        assert!(validate_slot_multiple(t(9, 0), t(10, 0), 30).is_ok());
        assert!(validate_slot_multiple(t(9, 0), t(10, 30), 30).is_ok());
        assert!(matches!(
            validate_slot_multiple(t(9, 0), t(9, 45), 30),
            Err(BookingError::BookingInvalidDurationForSlot { .. })
        ));
    }

    #[test]
    fn daily_caps() {
        assert!(validate_owner_daily_cap(1, 2).is_ok());
        assert!(matches!(
            validate_owner_daily_cap(2, 2),
            Err(BookingError::DailyBookingLimitExceeded(2))
        ));
        assert!(matches!(
            validate_client_daily_cap(1, 1),
            Err(BookingError::ClientDailyBookingLimitExceeded(1))
        ));
    }

    #[test]
    fn overlap_ignores_non_confirmed() {
        let cancelled = booking(BookingStatus::Cancelled, 9, 10);
        let request = TimeInterval::new(t(9, 0), t(10, 0));
        assert!(check_no_overlap(&[cancelled], &request).is_ok());

        let confirmed = booking(BookingStatus::Confirmed, 9, 10);
        let hit = check_no_overlap(&[confirmed.clone()], &request);
        assert_eq!(hit, Err(BookingError::BookingOverlap(confirmed.id)));
    }

    #[test]
    fn overlap_adjacent_is_allowed() {
        let existing = booking(BookingStatus::Confirmed, 9, 10);
        let request = TimeInterval::new(t(10, 0), t(11, 0));
        assert!(check_no_overlap(&[existing], &request).is_ok());
    }
}
