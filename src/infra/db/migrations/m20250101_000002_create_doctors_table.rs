//! Migration: Create the doctors table (one profile per doctor user).

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Doctors::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Doctors::Specialization).string().not_null())
                    .col(ColumnDef::new(Doctors::Experience).integer().not_null())
                    .col(ColumnDef::new(Doctors::FeesPerConsultation).double().not_null())
                    .col(ColumnDef::new(Doctors::Department).string().not_null())
                    .col(ColumnDef::new(Doctors::Bio).text().null())
                    .col(
                        ColumnDef::new(Doctors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctors_user_id")
                            .from(Doctors::Table, Doctors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Doctors {
    Table,
    Id,
    UserId,
    Specialization,
    Experience,
    FeesPerConsultation,
    Department,
    Bio,
    CreatedAt,
}
