//! Create bookings table
//!
//! The (stylist_id, date, time) and (customer_id, date, time) indexes back
//! the slot exclusivity check that runs inside the reservation transaction.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_customers::Customers;
use super::m20250601_000002_create_stylists::Stylists;
use super::m20250601_000003_create_service_variants::ServiceVariants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::CustomerId).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::ServiceVariantId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::StylistId).string())
                    .col(ColumnDef::new(Bookings::PromotionCode).string())
                    .col(ColumnDef::new(Bookings::Date).date().not_null())
                    .col(ColumnDef::new(Bookings::Time).time().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("Booked"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::DepositMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_customer")
                            .from(Bookings::Table, Bookings::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_service_variant")
                            .from(Bookings::Table, Bookings::ServiceVariantId)
                            .to(ServiceVariants::Table, ServiceVariants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_stylist")
                            .from(Bookings::Table, Bookings::StylistId)
                            .to(Stylists::Table, Stylists::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_stylist_slot")
                    .table(Bookings::Table)
                    .col(Bookings::StylistId)
                    .col(Bookings::Date)
                    .col(Bookings::Time)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_customer_slot")
                    .table(Bookings::Table)
                    .col(Bookings::CustomerId)
                    .col(Bookings::Date)
                    .col(Bookings::Time)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_date")
                    .table(Bookings::Table)
                    .col(Bookings::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    CustomerId,
    ServiceVariantId,
    StylistId,
    PromotionCode,
    Date,
    Time,
    Status,
    PriceMinor,
    DepositMinor,
    CreatedAt,
    UpdatedAt,
}
