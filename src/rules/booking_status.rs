//! Temporal state and cancellation eligibility of a booking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::enums::BookingStatus;

/// Bookings can be cancelled only while strictly more than this many hours
/// remain before they start.
pub const CANCELLATION_WINDOW_HOURS: f64 = 2.0;

/// Where a booking sits relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct BookingTiming {
    pub is_upcoming: bool,
    pub is_ongoing: bool,
    pub is_past: bool,
    pub can_cancel: bool,
    /// Fractional hours until start, floored at zero
    pub hours_until_booking: f64,
}

/// Classify a booking interval against `now`.
///
/// The interval is taken as given: when `end < start` the flags are reported
/// as computed, so a booking can be both upcoming and past.
pub fn booking_timing(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: BookingStatus,
    now: DateTime<Utc>,
) -> BookingTiming {
    let is_upcoming = start > now;
    let is_ongoing = now >= start && now <= end;
    let is_past = end < now;

    let hours_until_booking = ((start - now).num_milliseconds() as f64 / 3_600_000.0).max(0.0);

    let can_cancel = is_upcoming
        && hours_until_booking > CANCELLATION_WINDOW_HOURS
        && status != BookingStatus::Cancelled;

    BookingTiming {
        is_upcoming,
        is_ongoing,
        is_past,
        can_cancel,
        hours_until_booking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap()
    }

    fn timing(start_min: i64, end_min: i64, status: BookingStatus) -> BookingTiming {
        let now = now();
        booking_timing(
            now + Duration::minutes(start_min),
            now + Duration::minutes(end_min),
            status,
            now,
        )
    }

    #[test]
    fn test_upcoming_outside_window_can_cancel() {
        let t = timing(180, 240, BookingStatus::Confirmed);
        assert!(t.is_upcoming);
        assert!(!t.is_ongoing);
        assert!(!t.is_past);
        assert!(t.can_cancel);
        assert!((t.hours_until_booking - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_within_window_cannot_cancel() {
        let t = timing(60, 120, BookingStatus::Confirmed);
        assert!(t.is_upcoming);
        assert!(!t.can_cancel);
    }

    #[test]
    fn test_exactly_two_hours_cannot_cancel() {
        let t = timing(120, 180, BookingStatus::Pending);
        assert!(t.is_upcoming);
        assert!(!t.can_cancel);

        let t = timing(121, 180, BookingStatus::Pending);
        assert!(t.can_cancel);
    }

    #[test]
    fn test_cancelled_never_cancellable() {
        let t = timing(24 * 60, 25 * 60, BookingStatus::Cancelled);
        assert!(t.is_upcoming);
        assert!(!t.can_cancel);
    }

    #[test]
    fn test_ongoing_bounds_inclusive() {
        for (start, end) in [(0, 60), (-60, 0), (-30, 30)] {
            let t = timing(start, end, BookingStatus::Confirmed);
            assert!(t.is_ongoing, "start={} end={}", start, end);
            assert!(!t.is_upcoming);
            assert!(!t.is_past);
            assert!(!t.can_cancel);
            assert_eq!(t.hours_until_booking, 0.0);
        }
    }

    #[test]
    fn test_past() {
        let t = timing(-120, -60, BookingStatus::Completed);
        assert!(t.is_past);
        assert!(!t.is_upcoming);
        assert!(!t.is_ongoing);
        assert_eq!(t.hours_until_booking, 0.0);
    }

    #[test]
    fn test_hours_never_negative() {
        for start in [-10_000, -1, 0, 1, 10_000] {
            let t = timing(start, start + 60, BookingStatus::Confirmed);
            assert!(t.hours_until_booking >= 0.0);
        }
    }

    #[test]
    fn test_inverted_interval_is_not_repaired() {
        // start after now, end before now
        let t = timing(30, -30, BookingStatus::Confirmed);
        assert!(t.is_upcoming);
        assert!(t.is_past);
        assert!(!t.is_ongoing);

        // start before now, end before start
        let t = timing(-30, -60, BookingStatus::Confirmed);
        assert!(t.is_past);
        assert!(!t.is_ongoing);
        assert!(!t.is_upcoming);
    }
}
