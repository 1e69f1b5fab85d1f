//! Booking lifecycle service
//!
//! Status transitions, the time-gated check-in, and stylist reassignment.
//! Completion triggers the one-time thank-you enqueue; no other transition
//! emits notifications from here (reminders run on their own schedule).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::outbox::NotificationOutbox;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::notification::{Channel, NotificationKind};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::events::{BookingStatusChangedEvent, StylistAssignedEvent};
use crate::notifications::{Event, SharedEventBus};

pub struct BookingLifecycle {
    repos: Arc<dyn RepositoryProvider>,
    outbox: Arc<NotificationOutbox>,
    event_bus: SharedEventBus,
    check_in_window_minutes: i64,
}

impl BookingLifecycle {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        outbox: Arc<NotificationOutbox>,
        event_bus: SharedEventBus,
        check_in_window_minutes: i64,
    ) -> Self {
        Self {
            repos,
            outbox,
            event_bus,
            check_in_window_minutes,
        }
    }

    async fn load(&self, booking_id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })
    }

    /// Move a booking to a new lifecycle status.
    pub async fn update_status(
        &self,
        booking_id: &str,
        new_status: BookingStatus,
    ) -> DomainResult<Booking> {
        let booking = self.load(booking_id).await?;

        if !booking.status.can_transition_to(new_status) {
            return Err(DomainError::InvalidStatusTransition {
                from: booking.status.as_str(),
                to: new_status.as_str(),
            });
        }

        self.repos
            .bookings()
            .update_status(booking_id, new_status)
            .await?;

        info!(
            booking_id = %booking_id,
            from = booking.status.as_str(),
            to = new_status.as_str(),
            "Booking status changed"
        );

        self.event_bus
            .publish(Event::BookingStatusChanged(BookingStatusChangedEvent {
                booking_id: booking_id.to_string(),
                old_status: booking.status.as_str().to_string(),
                new_status: new_status.as_str().to_string(),
                timestamp: Utc::now(),
            }));

        if new_status == BookingStatus::Completed {
            self.send_thank_you(&booking).await;
        }

        self.load(booking_id).await
    }

    /// Check the customer in, permitted only within the configured window
    /// around the scheduled instant.
    pub async fn check_in(&self, booking_id: &str, now: DateTime<Utc>) -> DomainResult<Booking> {
        let booking = self.load(booking_id).await?;

        if !booking.within_check_in_window(now, self.check_in_window_minutes) {
            return Err(DomainError::OutsideCheckInWindow {
                window_minutes: self.check_in_window_minutes,
            });
        }

        self.update_status(booking_id, BookingStatus::CheckedIn).await
    }

    /// Reassign the stylist; re-runs the slot exclusivity check for the new
    /// (stylist, date, time) key, excluding this booking.
    pub async fn assign_stylist(
        &self,
        booking_id: &str,
        stylist_id: &str,
    ) -> DomainResult<Booking> {
        let booking = self.load(booking_id).await?;

        match booking.status {
            BookingStatus::Cancelled | BookingStatus::Completed => {
                return Err(DomainError::Validation(format!(
                    "cannot reassign a {} booking",
                    booking.status
                )));
            }
            _ => {}
        }

        self.repos
            .catalog()
            .find_stylist(stylist_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| {
                DomainError::InvalidSelection(format!("unknown stylist: {}", stylist_id))
            })?;

        let updated = self
            .repos
            .bookings()
            .assign_stylist(booking_id, stylist_id)
            .await?;

        self.event_bus
            .publish(Event::StylistAssigned(StylistAssignedEvent {
                booking_id: booking_id.to_string(),
                stylist_id: stylist_id.to_string(),
                timestamp: Utc::now(),
            }));

        Ok(updated)
    }

    /// One-time post-completion follow-up. Best-effort: the completed status
    /// stands even if the enqueue fails.
    async fn send_thank_you(&self, booking: &Booking) {
        let customer = match self.repos.customers().find_by_id(&booking.customer_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                warn!(booking_id = %booking.id, "Completed booking has no customer record");
                return;
            }
            Err(e) => {
                warn!(booking_id = %booking.id, "Failed to load customer for thank-you: {}", e);
                return;
            }
        };

        if !customer.email_opt_in {
            return;
        }

        let result = self
            .outbox
            .enqueue(
                &booking.id,
                NotificationKind::ThankYou,
                Channel::Email,
                &customer.email,
                Some("Thank you for visiting".to_string()),
                &format!(
                    "Hi {}, thank you for coming in! We'd love to see you again.",
                    customer.name
                ),
            )
            .await;
        if let Err(e) = result {
            warn!(booking_id = %booking.id, "Failed to enqueue thank-you email: {}", e);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::catalog::Stylist;
    use crate::domain::customer::Customer;
    use crate::domain::payment::Payment;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::notifications::create_event_bus;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        lifecycle: BookingLifecycle,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let outbox = Arc::new(NotificationOutbox::new(repos.clone()));
        let lifecycle = BookingLifecycle::new(repos.clone(), outbox, create_event_bus(), 30);
        Fixture { repos, lifecycle }
    }

    async fn seed_booking(fx: &Fixture, id: &str) -> Booking {
        let customer = Customer::guest("Ada", "ada@example.com", None, true, false);
        let customer_id = customer.id.clone();
        fx.repos.customers().save(customer).await.unwrap();

        let booking = Booking::new(
            id,
            customer_id,
            "svc-1",
            Some("sty-1".to_string()),
            None,
            chrono::NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            8_000,
            5_000,
        );
        let deposit = Payment::captured(booking.id.clone(), 5_000, "pi_1");
        fx.repos.bookings().reserve(booking.clone(), deposit).await.unwrap()
    }

    #[tokio::test]
    async fn full_lifecycle_to_completed() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;

        for status in [
            BookingStatus::CheckedIn,
            BookingStatus::InProgress,
            BookingStatus::Completed,
        ] {
            fx.lifecycle.update_status(&booking.id, status).await.unwrap();
        }

        let updated = fx.repos.bookings().find_by_id("bk-1").await.unwrap().unwrap();
        assert_eq!(updated.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn invalid_transition_is_rejected() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;

        let err = fx
            .lifecycle
            .update_status(&booking.id, BookingStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatusTransition { .. }));
    }

    #[tokio::test]
    async fn cancel_and_restore() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;

        fx.lifecycle
            .update_status(&booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        let restored = fx
            .lifecycle
            .update_status(&booking.id, BookingStatus::Booked)
            .await
            .unwrap();
        assert_eq!(restored.status, BookingStatus::Booked);
    }

    #[tokio::test]
    async fn completion_enqueues_thank_you_once() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;

        fx.lifecycle
            .update_status(&booking.id, BookingStatus::CheckedIn)
            .await
            .unwrap();
        fx.lifecycle
            .update_status(&booking.id, BookingStatus::InProgress)
            .await
            .unwrap();
        fx.lifecycle
            .update_status(&booking.id, BookingStatus::Completed)
            .await
            .unwrap();

        let records = fx
            .repos
            .notifications()
            .find_for_booking(&booking.id)
            .await
            .unwrap();
        let thank_yous: Vec<_> = records
            .iter()
            .filter(|r| r.kind == NotificationKind::ThankYou)
            .collect();
        assert_eq!(thank_yous.len(), 1);
    }

    #[tokio::test]
    async fn check_in_window_is_enforced() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;
        let scheduled = booking.scheduled_at();

        // 31 minutes early: rejected
        let err = fx
            .lifecycle
            .check_in(&booking.id, scheduled - Duration::minutes(31))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OutsideCheckInWindow { .. }));

        // 30 minutes early: allowed
        let checked_in = fx
            .lifecycle
            .check_in(&booking.id, scheduled - Duration::minutes(30))
            .await
            .unwrap();
        assert_eq!(checked_in.status, BookingStatus::CheckedIn);
    }

    #[tokio::test]
    async fn check_in_rejected_after_window() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;
        let scheduled = booking.scheduled_at();

        let err = fx
            .lifecycle
            .check_in(&booking.id, scheduled + Duration::minutes(31))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OutsideCheckInWindow { .. }));
    }

    #[tokio::test]
    async fn reassignment_requires_known_active_stylist() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;

        let err = fx
            .lifecycle
            .assign_stylist(&booking.id, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSelection(_)));

        let stylist = Stylist::new("Naomi", 0);
        let stylist_id = stylist.id.clone();
        fx.repos.catalog().save_stylist(stylist).await.unwrap();

        let updated = fx
            .lifecycle
            .assign_stylist(&booking.id, &stylist_id)
            .await
            .unwrap();
        assert_eq!(updated.stylist_id.as_deref(), Some(stylist_id.as_str()));
    }

    #[tokio::test]
    async fn reassignment_blocked_for_completed_booking() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1").await;

        for status in [
            BookingStatus::CheckedIn,
            BookingStatus::InProgress,
            BookingStatus::Completed,
        ] {
            fx.lifecycle.update_status(&booking.id, status).await.unwrap();
        }

        let stylist = Stylist::new("Naomi", 0);
        let stylist_id = stylist.id.clone();
        fx.repos.catalog().save_stylist(stylist).await.unwrap();

        let err = fx
            .lifecycle
            .assign_stylist(&booking.id, &stylist_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
