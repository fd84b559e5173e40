//! UTC date/time helpers. Dates are `YYYY-MM-DD`, wall-clock times are
//! 24-hour `HH:mm`, and every instant carries zeroed seconds and
//! sub-seconds.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::engine::BookingError;

pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidTimeFormat(s.to_string()))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| BookingError::InvalidTimeFormat(s.to_string()))
}

/// Construct a UTC instant from `YYYY-MM-DD` and `HH:mm` strings.
pub fn parse_date_time(date: &str, time: &str) -> Result<DateTime<Utc>, BookingError> {
    Ok(at(parse_date(date)?, parse_time(time)?))
}

/// Place a wall-clock time on a date, in UTC, seconds zeroed.
pub fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
        .expect("hour and minute are in range");
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Inverse projection: the `HH:mm` of an instant, UTC.
pub fn extract_time(ts: DateTime<Utc>) -> String {
    ts.format("%H:%M").to_string()
}

/// Weekday of a date, 0 = Sunday .. 6 = Saturday.
pub fn weekday(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Zero the seconds and sub-seconds of an instant.
pub fn normalize(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .expect("zeroing seconds cannot fail")
}

/// The `[00:00, 23:59]` window of a date, used to fetch the day's bookings.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is valid");
    let last_minute = NaiveTime::from_hms_opt(23, 59, 0).expect("23:59 is valid");
    (at(date, midnight), at(date, last_minute))
}
