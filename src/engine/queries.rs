use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use ulid::Ulid;

use crate::model::{Booking, BookingPolicy, Slot, TimeInterval};
use crate::observability::SLOT_QUERY_DURATION_SECONDS;
use crate::timemath;

use super::{interval, slots, Engine};

impl Engine {
    /// Free bookable slots for one owner and calendar date: resolve the
    /// day's source, merge its intervals, subtract confirmed bookings,
    /// slice into fixed-duration slots.
    pub async fn get_available_slots(&self, owner_id: Ulid, date: NaiveDate) -> Vec<Slot> {
        let started = std::time::Instant::now();
        let out = match self.free_slot_basis(owner_id, date).await {
            Some((free, slot_minutes, _)) => slots::generate_slots(&free, slot_minutes),
            None => {
                debug!("no availability source for owner {owner_id} on {date}");
                Vec::new()
            }
        };
        metrics::histogram!(SLOT_QUERY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        out
    }

    /// Dates within `[today, today + horizon_days)` offering at least one
    /// free slot.
    pub async fn get_available_days(&self, owner_id: Ulid, horizon_days: u32) -> Vec<NaiveDate> {
        self.available_days_from(owner_id, Utc::now().date_naive(), horizon_days)
            .await
    }

    /// Horizon scan from an explicit start date.
    pub async fn available_days_from(
        &self,
        owner_id: Ulid,
        start: NaiveDate,
        horizon_days: u32,
    ) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        for i in 0..horizon_days as i64 {
            let date = timemath::add_days(start, i);
            if !self.get_available_slots(owner_id, date).await.is_empty() {
                days.push(date);
            }
        }
        days
    }

    /// Confirmed bookings for an owner in a window. Lock-free.
    pub async fn list_bookings(
        &self,
        owner_id: Ulid,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Vec<Booking> {
        self.bookings
            .find_confirmed_in_range(owner_id, range_start, range_end)
            .await
    }

    pub async fn get_booking(&self, id: Ulid) -> Result<Booking, super::BookingError> {
        self.bookings
            .find_by_id(id)
            .await
            .ok_or(super::BookingError::BookingNotFound(id))
    }

    /// The day's free intervals after booking subtraction, with the slot
    /// duration and booking policy governing them. `None` when the day
    /// resolves to blocked or unavailable.
    pub(super) async fn free_slot_basis(
        &self,
        owner_id: Ulid,
        date: NaiveDate,
    ) -> Option<(Vec<TimeInterval>, i64, BookingPolicy)> {
        let plan = self.day_plan(owner_id, date).await?;
        let merged = interval::merge(plan.intervals);

        let (day_start, day_end) = timemath::day_bounds(date);
        let booked = self
            .bookings
            .find_confirmed_in_range(owner_id, day_start, day_end)
            .await;
        let occupied: Vec<TimeInterval> = booked.iter().map(Booking::interval).collect();

        let free = interval::subtract(&merged, &occupied);
        Some((free, plan.slot_duration_minutes, plan.policy))
    }
}
