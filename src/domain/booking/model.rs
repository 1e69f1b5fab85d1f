//! Booking domain entity

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::support::time::{scheduled_instant, truncate_to_minute};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Slot reserved and deposit captured
    Booked,
    /// Customer arrived at the salon
    CheckedIn,
    /// Service underway
    InProgress,
    /// Service finished; follow-up notification sent
    Completed,
    /// Cancelled by customer or staff; the slot is free again
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::CheckedIn => "CheckedIn",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Booked" => Self::Booked,
            "CheckedIn" => Self::CheckedIn,
            "InProgress" => Self::InProgress,
            "Completed" => Self::Completed,
            "Cancelled" => Self::Cancelled,
            // Unknown statuses keep the slot blocked
            _ => Self::Booked,
        }
    }

    /// Valid transitions of the booking lifecycle.
    ///
    /// `Booked → CheckedIn → InProgress → Completed`, `Booked → Cancelled`,
    /// and the manual restore `Cancelled → Booked`. `Completed` is terminal.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Booked, BookingStatus::CheckedIn)
                | (Self::Booked, BookingStatus::Cancelled)
                | (Self::CheckedIn, BookingStatus::InProgress)
                | (Self::InProgress, BookingStatus::Completed)
                | (Self::Cancelled, BookingStatus::Booked)
        )
    }

    /// A non-cancelled booking occupies its slot.
    pub fn blocks_slot(&self) -> bool {
        *self != Self::Cancelled
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a slot claim belongs to.
///
/// A booking with an assigned stylist claims that stylist's calendar; a
/// booking without one only prevents the same customer from double-booking
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOwner {
    Stylist(String),
    Customer(String),
}

/// The uniqueness key protected by the reservation transaction: no two
/// non-cancelled bookings may share the same owner, date and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotKey {
    pub owner: SlotOwner,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Appointment booking
#[derive(Debug, Clone)]
pub struct Booking {
    /// Unique booking ID
    pub id: String,
    /// Owning customer
    pub customer_id: String,
    /// Booked service variant
    pub service_variant_id: String,
    /// Assigned stylist, if any
    pub stylist_id: Option<String>,
    /// Promotion code applied at reservation time
    pub promotion_code: Option<String>,
    /// Appointment date
    pub date: NaiveDate,
    /// Appointment time of day (whole minutes)
    pub time: NaiveTime,
    /// Current status
    pub status: BookingStatus,
    /// Quoted service price in minor currency units, fixed at reservation time
    pub price_minor: i64,
    /// Deposit collected at reservation time, minor currency units
    pub deposit_minor: i64,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        service_variant_id: impl Into<String>,
        stylist_id: Option<String>,
        promotion_code: Option<String>,
        date: NaiveDate,
        time: NaiveTime,
        price_minor: i64,
        deposit_minor: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            service_variant_id: service_variant_id.into(),
            stylist_id,
            promotion_code,
            date,
            time: truncate_to_minute(time),
            status: BookingStatus::Booked,
            price_minor,
            deposit_minor,
            created_at: now,
            updated_at: now,
        }
    }

    /// The slot this booking claims while non-cancelled.
    pub fn slot_key(&self) -> SlotKey {
        let owner = match &self.stylist_id {
            Some(stylist) => SlotOwner::Stylist(stylist.clone()),
            None => SlotOwner::Customer(self.customer_id.clone()),
        };
        SlotKey {
            owner,
            date: self.date,
            time: self.time,
        }
    }

    /// The appointment as a single UTC instant.
    pub fn scheduled_at(&self) -> DateTime<Utc> {
        scheduled_instant(self.date, self.time)
    }

    /// Signed minutes between `now` and the scheduled instant.
    pub fn minutes_from_schedule(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.scheduled_at()).num_minutes()
    }

    /// Check-in is permitted within `window_minutes` either side of the
    /// scheduled instant.
    pub fn within_check_in_window(&self, now: DateTime<Utc>, window_minutes: i64) -> bool {
        self.minutes_from_schedule(now).abs() <= window_minutes
    }

    pub fn is_terminal(&self) -> bool {
        self.status == BookingStatus::Completed
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_booking() -> Booking {
        Booking::new(
            "bk-1",
            "cust-1",
            "svc-1",
            Some("sty-1".into()),
            None,
            NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            8_000,
            5_000,
        )
    }

    #[test]
    fn new_booking_is_booked() {
        let b = sample_booking();
        assert_eq!(b.status, BookingStatus::Booked);
        assert!(b.status.blocks_slot());
        assert!(!b.is_terminal());
    }

    #[test]
    fn slot_key_uses_stylist_when_assigned() {
        let b = sample_booking();
        assert_eq!(b.slot_key().owner, SlotOwner::Stylist("sty-1".into()));
    }

    #[test]
    fn slot_key_falls_back_to_customer() {
        let mut b = sample_booking();
        b.stylist_id = None;
        assert_eq!(b.slot_key().owner, SlotOwner::Customer("cust-1".into()));
    }

    #[test]
    fn seconds_are_truncated_from_slot_time() {
        let b = Booking::new(
            "bk-2",
            "cust-1",
            "svc-1",
            None,
            None,
            NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 59).unwrap(),
            8_000,
            5_000,
        );
        assert_eq!(b.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn lifecycle_transitions() {
        use BookingStatus::*;
        assert!(Booked.can_transition_to(CheckedIn));
        assert!(Booked.can_transition_to(Cancelled));
        assert!(CheckedIn.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Cancelled.can_transition_to(Booked));
    }

    #[test]
    fn completed_is_terminal() {
        use BookingStatus::*;
        for next in [Booked, CheckedIn, InProgress, Cancelled] {
            assert!(!Completed.can_transition_to(next));
        }
    }

    #[test]
    fn no_skipping_ahead() {
        use BookingStatus::*;
        assert!(!Booked.can_transition_to(InProgress));
        assert!(!Booked.can_transition_to(Completed));
        assert!(!CheckedIn.can_transition_to(Completed));
    }

    #[test]
    fn cancelled_does_not_block() {
        assert!(!BookingStatus::Cancelled.blocks_slot());
        assert!(BookingStatus::Booked.blocks_slot());
        assert!(BookingStatus::Completed.blocks_slot());
    }

    #[test]
    fn check_in_window_boundaries() {
        let b = sample_booking();
        let scheduled = b.scheduled_at();
        assert!(b.within_check_in_window(scheduled - Duration::minutes(30), 30));
        assert!(b.within_check_in_window(scheduled + Duration::minutes(30), 30));
        assert!(!b.within_check_in_window(scheduled - Duration::minutes(31), 30));
        assert!(!b.within_check_in_window(scheduled + Duration::minutes(31), 30));
    }

    #[test]
    fn status_display_roundtrip() {
        for status in &[
            BookingStatus::Booked,
            BookingStatus::CheckedIn,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let parsed = BookingStatus::from_str(status.as_str());
            assert_eq!(&parsed, status);
        }
    }

    #[test]
    fn unknown_status_blocks_slot() {
        let s = BookingStatus::from_str("Garbage");
        assert!(s.blocks_slot());
    }
}
