//! Event types broadcast to subscribers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Reservation committed (booking + deposit recorded)
    BookingCreated(BookingCreatedEvent),
    /// Booking moved to a new lifecycle status
    BookingStatusChanged(BookingStatusChangedEvent),
    /// Stylist (re)assigned to a booking
    StylistAssigned(StylistAssignedEvent),
    /// Reminder enqueued for an upcoming booking
    ReminderSent(ReminderSentEvent),
    /// Refund compensation failed; the charge is unreconciled until an
    /// operator intervenes
    RefundFailed(RefundFailedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::BookingCreated(_) => "booking_created",
            Event::BookingStatusChanged(_) => "booking_status_changed",
            Event::StylistAssigned(_) => "stylist_assigned",
            Event::ReminderSent(_) => "reminder_sent",
            Event::RefundFailed(_) => "refund_failed",
        }
    }

    /// Get the booking ID if applicable
    pub fn booking_id(&self) -> Option<&str> {
        match self {
            Event::BookingCreated(e) => Some(&e.booking_id),
            Event::BookingStatusChanged(e) => Some(&e.booking_id),
            Event::StylistAssigned(e) => Some(&e.booking_id),
            Event::ReminderSent(e) => Some(&e.booking_id),
            Event::RefundFailed(e) => e.booking_id.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedEvent {
    pub booking_id: String,
    pub customer_id: String,
    pub stylist_id: Option<String>,
    pub date: String,
    pub time: String,
    pub deposit_minor: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusChangedEvent {
    pub booking_id: String,
    pub old_status: String,
    pub new_status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylistAssignedEvent {
    pub booking_id: String,
    pub stylist_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSentEvent {
    pub booking_id: String,
    pub channel: String,
    pub timestamp: DateTime<Utc>,
}

/// The charge behind `payment_ref` was captured but its reservation failed,
/// and the refund attempt also failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundFailedEvent {
    pub booking_id: Option<String>,
    pub payment_ref: String,
    pub amount_minor: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
