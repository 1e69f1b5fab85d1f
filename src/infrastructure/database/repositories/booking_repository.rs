//! SeaORM implementation of BookingRepository
//!
//! The slot exclusivity check and the booking/payment inserts run inside one
//! database transaction, so concurrent reservation attempts for the same key
//! serialize on the store and at most one can commit.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus, SlotKey, SlotOwner};
use crate::domain::payment::Payment;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, payment};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        id: m.id,
        customer_id: m.customer_id,
        service_variant_id: m.service_variant_id,
        stylist_id: m.stylist_id,
        promotion_code: m.promotion_code,
        date: m.date,
        time: m.time,
        status: BookingStatus::from_str(&m.status),
        price_minor: m.price_minor,
        deposit_minor: m.deposit_minor,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn booking_active_model(b: &Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id.clone()),
        customer_id: Set(b.customer_id.clone()),
        service_variant_id: Set(b.service_variant_id.clone()),
        stylist_id: Set(b.stylist_id.clone()),
        promotion_code: Set(b.promotion_code.clone()),
        date: Set(b.date),
        time: Set(b.time),
        status: Set(b.status.as_str().to_string()),
        price_minor: Set(b.price_minor),
        deposit_minor: Set(b.deposit_minor),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

fn payment_active_model(p: &Payment) -> payment::ActiveModel {
    payment::ActiveModel {
        id: Set(p.id.clone()),
        booking_id: Set(p.booking_id.clone()),
        amount_minor: Set(p.amount_minor),
        external_ref: Set(p.external_ref.clone()),
        status: Set(p.status.as_str().to_string()),
        created_at: Set(p.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn conflict_for(key: &SlotKey) -> DomainError {
    DomainError::SlotConflict {
        date: key.date.to_string(),
        time: key.time.format("%H:%M").to_string(),
    }
}

/// Whether a non-cancelled booking other than `exclude` claims the key.
///
/// Runs on whatever connection it is given; the reservation path passes the
/// open transaction so check-then-insert is atomic.
async fn slot_conflict_exists<C: ConnectionTrait>(
    conn: &C,
    key: &SlotKey,
    exclude: Option<&str>,
) -> DomainResult<bool> {
    let mut query = booking::Entity::find()
        .filter(booking::Column::Date.eq(key.date))
        .filter(booking::Column::Time.eq(key.time))
        .filter(booking::Column::Status.ne(BookingStatus::Cancelled.as_str()));

    query = match &key.owner {
        SlotOwner::Stylist(stylist_id) => {
            query.filter(booking::Column::StylistId.eq(stylist_id.clone()))
        }
        // No stylist requested: the customer must not already hold a
        // non-cancelled booking at the same date and time.
        SlotOwner::Customer(customer_id) => {
            query.filter(booking::Column::CustomerId.eq(customer_id.clone()))
        }
    };

    if let Some(id) = exclude {
        query = query.filter(booking::Column::Id.ne(id));
    }

    let existing = query.one(conn).await.map_err(db_err)?;
    Ok(existing.is_some())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn reserve(&self, b: Booking, deposit: Payment) -> DomainResult<Booking> {
        if deposit.booking_id != b.id {
            return Err(DomainError::Validation(
                "Deposit payment does not reference the booking".to_string(),
            ));
        }

        debug!("Reserving slot for booking {}", b.id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let key = b.slot_key();
        if slot_conflict_exists(&txn, &key, None).await? {
            txn.rollback().await.map_err(db_err)?;
            return Err(conflict_for(&key));
        }

        booking_active_model(&b).insert(&txn).await.map_err(db_err)?;
        payment_active_model(&deposit)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(b)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_scheduled_on(&self, date: NaiveDate) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Date.eq(date))
            .order_by_asc(booking::Column::Time)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
        let existing = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: booking::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn assign_stylist(&self, id: &str, stylist_id: &str) -> DomainResult<Booking> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = booking::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            });
        };

        let key = SlotKey {
            owner: SlotOwner::Stylist(stylist_id.to_string()),
            date: existing.date,
            time: existing.time,
        };
        if slot_conflict_exists(&txn, &key, Some(id)).await? {
            txn.rollback().await.map_err(db_err)?;
            return Err(conflict_for(&key));
        }

        let mut active: booking::ActiveModel = existing.into();
        active.stylist_id = Set(Some(stylist_id.to_string()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }
}
