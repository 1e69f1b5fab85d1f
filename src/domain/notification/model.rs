//! Notification ledger entities
//!
//! Each record is one logical notification event, written once and never
//! mutated. The dispatcher (an external worker) drains the ledger; the
//! reminder scheduler reads it back to suppress duplicate sends.

use chrono::{DateTime, Utc};

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "SMS" => Self::Sms,
            _ => Self::Email,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of booking event a notification correlates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Sent right after a successful reservation
    Confirmation,
    /// Sent the day before the appointment
    Reminder,
    /// Sent once when a booking completes
    ThankYou,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmation => "CONFIRMATION",
            Self::Reminder => "REMINDER",
            Self::ThankYou => "THANK_YOU",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "REMINDER" => Self::Reminder,
            "THANK_YOU" => Self::ThankYou,
            _ => Self::Confirmation,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One enqueued notification
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    /// Unique record ID
    pub id: String,
    /// Originating booking (correlation key, with `kind`)
    pub booking_id: String,
    pub kind: NotificationKind,
    pub channel: Channel,
    /// Email address or phone number
    pub destination: String,
    /// Subject line; unused for SMS
    pub subject: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(
        booking_id: impl Into<String>,
        kind: NotificationKind,
        channel: Channel,
        destination: impl Into<String>,
        subject: Option<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            booking_id: booking_id.into(),
            kind,
            channel,
            destination: destination.into(),
            subject,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_channel_roundtrip() {
        for kind in &[
            NotificationKind::Confirmation,
            NotificationKind::Reminder,
            NotificationKind::ThankYou,
        ] {
            assert_eq!(&NotificationKind::from_str(kind.as_str()), kind);
        }
        for channel in &[Channel::Email, Channel::Sms] {
            assert_eq!(&Channel::from_str(channel.as_str()), channel);
        }
    }

    #[test]
    fn record_carries_correlation_keys() {
        let r = NotificationRecord::new(
            "bk-1",
            NotificationKind::Reminder,
            Channel::Email,
            "ada@example.com",
            Some("See you tomorrow".into()),
            "Your appointment is tomorrow at 14:30.",
        );
        assert_eq!(r.booking_id, "bk-1");
        assert_eq!(r.kind, NotificationKind::Reminder);
    }
}
