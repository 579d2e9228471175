//! Create guests table

use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Guests::ReservationId).integer().not_null())
                    .col(ColumnDef::new(Guests::FirstName).string().not_null())
                    .col(ColumnDef::new(Guests::LastName).string().not_null())
                    .col(ColumnDef::new(Guests::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Guests::DocumentType).string_len(20).not_null())
                    .col(ColumnDef::new(Guests::DocumentNumber).string().not_null())
                    .col(ColumnDef::new(Guests::Gender).string_len(10).not_null())
                    .col(ColumnDef::new(Guests::Email).string().not_null())
                    .col(ColumnDef::new(Guests::Phone).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guests_reservation")
                            .from(Guests::Table, Guests::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guests_reservation")
                    .table(Guests::Table)
                    .col(Guests::ReservationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Guests {
    Table,
    Id,
    ReservationId,
    FirstName,
    LastName,
    DateOfBirth,
    DocumentType,
    DocumentNumber,
    Gender,
    Email,
    Phone,
}
