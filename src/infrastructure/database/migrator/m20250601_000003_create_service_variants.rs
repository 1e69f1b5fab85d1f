//! Create service_variants table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceVariants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceVariants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceVariants::Name).string().not_null())
                    .col(
                        ColumnDef::new(ServiceVariants::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceVariants::PriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceVariants::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceVariants::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceVariants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceVariants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceVariants {
    Table,
    Id,
    Name,
    Category,
    PriceMinor,
    DurationMinutes,
    IsActive,
    CreatedAt,
}
