//! Create the `customer` table.
//!
//! The id is store-assigned (auto-increment); email carries a unique
//! constraint so concurrent duplicate registrations fail at the database
//! rather than relying on the application-level existence check alone.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(pk_auto(Customer::Id))
                    .col(string_len(Customer::Name, 128).not_null())
                    .col(string_len(Customer::Email, 255).unique_key().not_null())
                    .col(string_len(Customer::PasswordHash, 255).not_null())
                    .col(integer(Customer::Age).not_null())
                    .col(string_len(Customer::Gender, 16).not_null())
                    .col(
                        ColumnDef::new(Customer::ProfileImageId)
                            .string_len(64)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Age,
    Gender,
    ProfileImageId,
    CreatedAt,
    UpdatedAt,
}
