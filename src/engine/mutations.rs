use chrono::{DateTime, Utc};
use tracing::{debug, info};
use ulid::Ulid;

use crate::model::{Booking, BookingStatus, TimeInterval};
use crate::observability::{
    BOOKINGS_CREATED_TOTAL, BOOKINGS_REJECTED_TOTAL, BOOKING_CONFLICTS_TOTAL,
    BOOKING_TRANSITIONS_TOTAL,
};
use crate::timemath;

use super::{slots, validate, BookingError, Engine};

impl Engine {
    /// Create a confirmed booking.
    ///
    /// The policy checks, daily caps, overlap check, slot coverage check,
    /// and the insert all run inside this owner's critical section: among
    /// concurrent overlapping requests exactly one commits, the rest fail
    /// with [`BookingError::BookingOverlap`]. The lock is released by
    /// guard drop on every path, success or error.
    pub async fn create_booking(
        &self,
        owner_id: Ulid,
        client_id: Ulid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let start_at = timemath::normalize(start_at);
        let end_at = timemath::normalize(end_at);
        validate::validate_time_range(start_at, end_at)?;

        let _guard = self.locks.acquire(owner_id).await;
        let result = self
            .create_booking_locked(owner_id, client_id, start_at, end_at, Utc::now())
            .await;

        match &result {
            Ok(booking) => {
                info!(
                    "booked {} for owner {owner_id}: {start_at} .. {end_at}",
                    booking.id
                );
                metrics::counter!(BOOKINGS_CREATED_TOTAL).increment(1);
            }
            Err(e) if e.is_conflict() => {
                debug!("booking conflict for owner {owner_id}: {e}");
                metrics::counter!(BOOKING_CONFLICTS_TOTAL).increment(1);
            }
            Err(e) => {
                debug!("booking rejected for owner {owner_id}: {e}");
                metrics::counter!(BOOKINGS_REJECTED_TOTAL).increment(1);
            }
        }
        result
    }

    /// The critical section body. Caller holds the owner's lock.
    pub(super) async fn create_booking_locked(
        &self,
        owner_id: Ulid,
        client_id: Ulid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        validate::validate_not_in_past(start_at, now)?;

        let date = start_at.date_naive();
        let Some((free, slot_minutes, policy)) = self.free_slot_basis(owner_id, date).await
        else {
            return Err(BookingError::SlotNotAvailable);
        };

        if let Some(min_advance) = policy.min_advance_minutes {
            validate::validate_min_advance(start_at, now, min_advance)?;
        }
        if let Some(max_duration) = policy.max_duration_minutes {
            validate::validate_max_duration(start_at, end_at, max_duration)?;
        }
        validate::validate_slot_multiple(start_at, end_at, slot_minutes)?;

        if let Some(cap) = policy.max_bookings_per_day {
            let count = self.bookings.count_confirmed_on(owner_id, date).await;
            validate::validate_owner_daily_cap(count, cap)?;
        }
        if let Some(cap) = policy.max_bookings_per_client_per_day {
            let count = self
                .bookings
                .count_confirmed_by_client_on(client_id, owner_id, date)
                .await;
            validate::validate_client_daily_cap(count, cap)?;
        }

        // The double-booking authority: checked against committed state
        // while holding the owner's lock, and surfaced distinctly so
        // callers can retry with a different slot.
        let request = TimeInterval::new(start_at, end_at);
        let (day_start, day_end) = timemath::day_bounds(date);
        let existing = self
            .bookings
            .find_confirmed_in_range(owner_id, day_start, day_end)
            .await;
        validate::check_no_overlap(&existing, &request)?;

        let free_slots = slots::slot_intervals(&free, slot_minutes);
        if !slots::covered_by_slots(&free_slots, &request) {
            return Err(BookingError::SlotNotAvailable);
        }

        let booking = Booking {
            id: Ulid::new(),
            owner_id,
            client_id,
            start_at,
            end_at,
            status: BookingStatus::Confirmed,
        };
        Ok(self.bookings.insert(booking).await)
    }

    /// Cancel a booking. Cancelling an already-cancelled booking is a
    /// no-op; a completed or no-show booking cannot be cancelled.
    pub async fn cancel_booking(&self, id: Ulid) -> Result<Booking, BookingError> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    pub async fn complete_booking(&self, id: Ulid) -> Result<Booking, BookingError> {
        self.transition(id, BookingStatus::Completed).await
    }

    pub async fn mark_no_show(&self, id: Ulid) -> Result<Booking, BookingError> {
        self.transition(id, BookingStatus::NoShow).await
    }

    /// Status machine: `Confirmed` may move to any terminal state;
    /// repeating a transition is a no-op; terminal states never change.
    async fn transition(
        &self,
        id: Ulid,
        to: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await
            .ok_or(BookingError::BookingNotFound(id))?;

        if booking.status == to {
            return Ok(booking);
        }
        if booking.status.is_terminal() {
            return Err(BookingError::InvalidStatusTransition {
                id,
                status: booking.status,
                requested: to,
            });
        }

        let mut updated = booking;
        updated.status = to;
        let updated = self.bookings.update(updated).await?;
        info!("booking {id} -> {to:?}");
        metrics::counter!(BOOKING_TRANSITIONS_TOTAL).increment(1);
        Ok(updated)
    }
}
