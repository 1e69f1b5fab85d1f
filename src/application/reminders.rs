//! Reminder scheduler
//!
//! Runs in the background on a fixed cadence. Each pass picks up the
//! non-cancelled bookings scheduled exactly one calendar day ahead whose
//! time-of-day matches the current hour, and enqueues one reminder per
//! consented channel. The notification ledger is the dedup source of truth:
//! a (booking, REMINDER, channel) record suppresses the send, so repeated
//! passes within the same hour stay at-least-once without duplicates.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::application::outbox::NotificationOutbox;
use crate::domain::booking::Booking;
use crate::domain::customer::Customer;
use crate::domain::notification::{Channel, NotificationKind};
use crate::domain::{DomainResult, RepositoryProvider};
use crate::notifications::events::ReminderSentEvent;
use crate::notifications::{Event, SharedEventBus};
use crate::support::shutdown::ShutdownSignal;

/// Configuration for the reminder scheduler
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// How often a pass runs (in seconds)
    pub check_interval_secs: u64,
    /// How many days ahead a reminder goes out
    pub lead_days: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 3600, // hourly
            lead_days: 1,
        }
    }
}

/// Reminder scheduler
///
/// One instance runs per deployment; the ledger check keeps repeated or
/// overlapping passes from double-sending.
#[derive(Clone)]
pub struct ReminderScheduler {
    repos: Arc<dyn RepositoryProvider>,
    outbox: Arc<NotificationOutbox>,
    event_bus: SharedEventBus,
    config: ReminderConfig,
    /// Running state
    running: Arc<RwLock<bool>>,
}

impl ReminderScheduler {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        outbox: Arc<NotificationOutbox>,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            repos,
            outbox,
            event_bus,
            config: ReminderConfig::default(),
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn with_config(mut self, config: ReminderConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the reminder background task
    pub fn start(&self, shutdown: ShutdownSignal) {
        let scheduler = self.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            {
                let mut r = running.write().await;
                *r = true;
            }

            info!(
                "🔔 Reminder scheduler started (interval: {}s, lead: {} day(s))",
                scheduler.config.check_interval_secs, scheduler.config.lead_days
            );

            let mut interval =
                tokio::time::interval(Duration::from_secs(scheduler.config.check_interval_secs));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        match scheduler.run_once(Utc::now()).await {
                            Ok(sent) if sent > 0 => {
                                info!("Reminder pass sent {} notification(s)", sent);
                            }
                            Ok(_) => {}
                            Err(e) => warn!("Reminder pass error: {}", e),
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("🔔 Reminder scheduler shutting down");
                        break;
                    }
                }
            }

            {
                let mut r = running.write().await;
                *r = false;
            }

            info!("🔔 Reminder scheduler stopped");
        });
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// One scheduler pass; returns the number of reminders enqueued.
    pub async fn run_once(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let target_date = now.date_naive() + chrono::Duration::days(self.config.lead_days);
        let bookings = self.repos.bookings().find_scheduled_on(target_date).await?;

        let mut sent = 0;
        for booking in bookings {
            if !booking.status.blocks_slot() {
                continue; // cancelled bookings get no reminder
            }
            if booking.time.hour() != now.hour() {
                continue;
            }
            sent += self.remind(&booking).await?;
        }
        Ok(sent)
    }

    async fn remind(&self, booking: &Booking) -> DomainResult<usize> {
        let Some(customer) = self
            .repos
            .customers()
            .find_by_id(&booking.customer_id)
            .await?
        else {
            warn!(booking_id = %booking.id, "Booking has no customer record, skipping reminder");
            return Ok(0);
        };

        let when = format!("{} at {}", booking.date, booking.time.format("%H:%M"));
        let mut sent = 0;

        if customer.email_opt_in {
            sent += self
                .send_on(
                    booking,
                    Channel::Email,
                    &customer.email,
                    Some("Appointment reminder".to_string()),
                    &format!(
                        "Hi {}, a reminder that your appointment is tomorrow, {}.",
                        customer.name, when
                    ),
                )
                .await?;
        }

        if customer.can_receive_sms() {
            let destination = sms_destination(&customer);
            sent += self
                .send_on(
                    booking,
                    Channel::Sms,
                    &destination,
                    None,
                    &format!("Reminder: appointment tomorrow, {}.", when),
                )
                .await?;
        }

        Ok(sent)
    }

    async fn send_on(
        &self,
        booking: &Booking,
        channel: Channel,
        destination: &str,
        subject: Option<String>,
        body: &str,
    ) -> DomainResult<usize> {
        if self
            .outbox
            .already_sent(&booking.id, NotificationKind::Reminder, channel)
            .await?
        {
            return Ok(0);
        }

        self.outbox
            .enqueue(
                &booking.id,
                NotificationKind::Reminder,
                channel,
                destination,
                subject,
                body,
            )
            .await?;

        metrics::counter!("booking_reminders_total").increment(1);
        self.event_bus.publish(Event::ReminderSent(ReminderSentEvent {
            booking_id: booking.id.clone(),
            channel: channel.as_str().to_string(),
            timestamp: Utc::now(),
        }));

        Ok(1)
    }
}

fn sms_destination(customer: &Customer) -> String {
    customer.phone.clone().unwrap_or_default()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    use crate::domain::booking::BookingStatus;
    use crate::domain::payment::Payment;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::notifications::create_event_bus;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        scheduler: ReminderScheduler,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let outbox = Arc::new(NotificationOutbox::new(repos.clone()));
        let scheduler = ReminderScheduler::new(repos.clone(), outbox, create_event_bus());
        Fixture { repos, scheduler }
    }

    /// A pass running the day before the appointment, in the matching hour.
    fn pass_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 19, 14, 5, 0).unwrap()
    }

    async fn seed_booking(fx: &Fixture, id: &str, sms: bool) -> Booking {
        let email = format!("{}@example.com", id);
        let customer = Customer::guest(
            "Ada",
            email,
            if sms { Some("+15550100".into()) } else { None },
            true,
            sms,
        );
        let customer_id = customer.id.clone();
        fx.repos.customers().save(customer).await.unwrap();

        let booking = Booking::new(
            id,
            customer_id,
            "svc-1",
            Some(format!("sty-{}", id)),
            None,
            NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            8_000,
            5_000,
        );
        let deposit = Payment::captured(booking.id.clone(), 5_000, "pi_1");
        fx.repos.bookings().reserve(booking.clone(), deposit).await.unwrap()
    }

    #[tokio::test]
    async fn reminds_once_per_channel() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1", true).await;

        let sent = fx.scheduler.run_once(pass_instant()).await.unwrap();
        assert_eq!(sent, 2); // email + SMS

        let records = fx
            .repos
            .notifications()
            .find_for_booking(&booking.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == NotificationKind::Reminder));
    }

    #[tokio::test]
    async fn repeated_passes_do_not_duplicate() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1", false).await;

        assert_eq!(fx.scheduler.run_once(pass_instant()).await.unwrap(), 1);
        assert_eq!(fx.scheduler.run_once(pass_instant()).await.unwrap(), 0);
        assert_eq!(fx.scheduler.run_once(pass_instant()).await.unwrap(), 0);

        let records = fx
            .repos
            .notifications()
            .find_for_booking(&booking.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_bookings_are_skipped() {
        let fx = fixture().await;
        let booking = seed_booking(&fx, "bk-1", false).await;
        fx.repos
            .bookings()
            .update_status(&booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();

        assert_eq!(fx.scheduler.run_once(pass_instant()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn only_the_matching_hour_fires() {
        let fx = fixture().await;
        seed_booking(&fx, "bk-1", false).await;

        // Appointment is at 14:30; a 9 o'clock pass must not fire
        let morning = Utc.with_ymd_and_hms(2026, 5, 19, 9, 5, 0).unwrap();
        assert_eq!(fx.scheduler.run_once(morning).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn only_the_day_before_fires() {
        let fx = fixture().await;
        seed_booking(&fx, "bk-1", false).await;

        // Two days ahead: nothing
        let early = Utc.with_ymd_and_hms(2026, 5, 18, 14, 5, 0).unwrap();
        assert_eq!(fx.scheduler.run_once(early).await.unwrap(), 0);

        // Same day: nothing either
        let same_day = Utc.with_ymd_and_hms(2026, 5, 20, 14, 5, 0).unwrap();
        assert_eq!(fx.scheduler.run_once(same_day).await.unwrap(), 0);
    }
}
