//! Migration: Create services table, owned by users.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Services::Name).string().not_null())
                    .col(ColumnDef::new(Services::Description).text().not_null())
                    .col(ColumnDef::new(Services::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_user")
                            .from(Services::Table, Services::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One name per owner
        manager
            .create_index(
                Index::create()
                    .name("idx_services_name_user")
                    .table(Services::Table)
                    .col(Services::Name)
                    .col(Services::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Owner-scoped lookups by id
        manager
            .create_index(
                Index::create()
                    .name("idx_services_id_user")
                    .table(Services::Table)
                    .col(Services::Id)
                    .col(Services::UserId)
                    .to_owned(),
            )
            .await?;

        // Owner listings ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_services_user_created_at")
                    .table(Services::Table)
                    .col(Services::UserId)
                    .col(Services::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Services {
    Table,
    Id,
    Name,
    Description,
    UserId,
    CreatedAt,
    UpdatedAt,
}
