//! SeaORM implementation of NotificationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::notification::{
    Channel, NotificationKind, NotificationRecord, NotificationRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::notification;

pub struct SeaOrmNotificationRepository {
    db: DatabaseConnection,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: notification::Model) -> NotificationRecord {
    NotificationRecord {
        id: m.id,
        booking_id: m.booking_id,
        kind: NotificationKind::from_str(&m.kind),
        channel: Channel::from_str(&m.channel),
        destination: m.destination,
        subject: m.subject,
        body: m.body,
        created_at: m.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn append(&self, r: NotificationRecord) -> DomainResult<NotificationRecord> {
        let model = notification::ActiveModel {
            id: Set(r.id.clone()),
            booking_id: Set(r.booking_id.clone()),
            kind: Set(r.kind.as_str().to_string()),
            channel: Set(r.channel.as_str().to_string()),
            destination: Set(r.destination.clone()),
            subject: Set(r.subject.clone()),
            body: Set(r.body.clone()),
            created_at: Set(r.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(r)
    }

    async fn exists_for(
        &self,
        booking_id: &str,
        kind: NotificationKind,
        channel: Channel,
    ) -> DomainResult<bool> {
        let existing = notification::Entity::find()
            .filter(notification::Column::BookingId.eq(booking_id))
            .filter(notification::Column::Kind.eq(kind.as_str()))
            .filter(notification::Column::Channel.eq(channel.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(existing.is_some())
    }

    async fn find_for_booking(&self, booking_id: &str) -> DomainResult<Vec<NotificationRecord>> {
        let models = notification::Entity::find()
            .filter(notification::Column::BookingId.eq(booking_id))
            .order_by_asc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
