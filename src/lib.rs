//! Availability resolution and concurrency-safe booking creation.
//!
//! Owners publish weekly and date-specific availability rules; exceptions
//! block or override single days. The engine resolves the winning source
//! for a date, merges its working intervals, subtracts confirmed bookings,
//! and slices the remainder into fixed-duration slots. Booking creation
//! runs inside a per-owner critical section so racing requests for the
//! same slot produce exactly one confirmed booking.

pub mod engine;
pub mod model;
pub mod observability;
pub mod reaper;
pub mod store;
pub mod timemath;

pub use engine::{BookingError, Engine};
pub use model::{
    AvailabilityException, AvailabilityRule, Booking, BookingPolicy, BookingStatus,
    ExceptionKind, RuleSchedule, Slot, TimeInterval,
};
