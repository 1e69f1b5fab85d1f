//! Create stylists table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stylists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stylists::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stylists::Name).string().not_null())
                    .col(
                        ColumnDef::new(Stylists::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Stylists::PriceModifierMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Stylists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stylists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Stylists {
    Table,
    Id,
    Name,
    IsActive,
    PriceModifierMinor,
    CreatedAt,
}
