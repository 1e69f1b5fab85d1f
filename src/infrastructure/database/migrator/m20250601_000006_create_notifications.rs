//! Create notifications table
//!
//! The unique (booking_id, kind, channel) index is the store-level guard
//! against duplicate reminder sends; the scheduler also checks before
//! inserting, but the index is authoritative.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notifications::BookingId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Channel).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Destination)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Subject).string())
                    .col(ColumnDef::new(Notifications::Body).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_booking_kind_channel")
                    .table(Notifications::Table)
                    .col(Notifications::BookingId)
                    .col(Notifications::Kind)
                    .col(Notifications::Channel)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Notifications {
    Table,
    Id,
    BookingId,
    Kind,
    Channel,
    Destination,
    Subject,
    Body,
    CreatedAt,
}
