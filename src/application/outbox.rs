//! Notification outbox
//!
//! Durable enqueue into the notification ledger. An external dispatcher
//! drains the ledger and does the actual sending; enqueue here only appends
//! the record. Callers that need dedup (the reminder scheduler) check
//! [`NotificationOutbox::already_sent`] first; enqueue itself is append-only
//! and not deduplicating, though the store-level unique index backstops it.

use std::sync::Arc;

use crate::domain::notification::{Channel, NotificationKind, NotificationRecord};
use crate::domain::{DomainResult, RepositoryProvider};

pub struct NotificationOutbox {
    repos: Arc<dyn RepositoryProvider>,
}

impl NotificationOutbox {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Append one notification to the ledger.
    pub async fn enqueue(
        &self,
        booking_id: &str,
        kind: NotificationKind,
        channel: Channel,
        destination: &str,
        subject: Option<String>,
        body: &str,
    ) -> DomainResult<NotificationRecord> {
        let record = NotificationRecord::new(booking_id, kind, channel, destination, subject, body);
        self.repos.notifications().append(record).await
    }

    /// Whether the ledger already holds a record for this
    /// (booking, kind, channel).
    pub async fn already_sent(
        &self,
        booking_id: &str,
        kind: NotificationKind,
        channel: Channel,
    ) -> DomainResult<bool> {
        self.repos
            .notifications()
            .exists_for(booking_id, kind, channel)
            .await
    }
}
