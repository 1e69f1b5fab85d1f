//! Date/time helpers for scheduled appointments.
//!
//! Bookings store a calendar date and a wall-clock time separately; the two
//! are combined into a single UTC instant only when comparing against "now"
//! (check-in window, reminders).

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Combine a stored booking date and time-of-day into a UTC instant.
pub fn scheduled_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Truncate a time-of-day to whole minutes.
///
/// Slot times are compared by hour and minute only, so seconds are dropped
/// before a time is stored or matched.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(
        chrono::Timelike::hour(&time),
        chrono::Timelike::minute(&time),
        0,
    )
    .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let instant = scheduled_instant(date, time);
        assert_eq!(instant.to_rfc3339(), "2026-03-14T09:30:00+00:00");
    }

    #[test]
    fn truncates_seconds() {
        let time = NaiveTime::from_hms_opt(9, 30, 42).unwrap();
        assert_eq!(
            truncate_to_minute(time),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
    }
}
