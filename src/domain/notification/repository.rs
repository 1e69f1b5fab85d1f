//! Notification ledger repository interface

use async_trait::async_trait;

use super::model::{Channel, NotificationKind, NotificationRecord};
use crate::domain::DomainResult;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append a record to the ledger
    async fn append(&self, record: NotificationRecord) -> DomainResult<NotificationRecord>;

    /// Whether a record already exists for (booking, kind, channel).
    ///
    /// This is the reminder dedup check; the same triple is also enforced
    /// with a unique index at the store level.
    async fn exists_for(
        &self,
        booking_id: &str,
        kind: NotificationKind,
        channel: Channel,
    ) -> DomainResult<bool>;

    /// All records for a booking, oldest first
    async fn find_for_booking(&self, booking_id: &str) -> DomainResult<Vec<NotificationRecord>>;
}
