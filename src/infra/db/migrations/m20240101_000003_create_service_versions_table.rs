//! Migration: Create service_versions table, owned by services.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_services_table::Services;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceVersions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceVersions::Version).string().not_null())
                    .col(
                        ColumnDef::new(ServiceVersions::Changelog)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ServiceVersions::ServiceId).integer().not_null())
                    .col(
                        ColumnDef::new(ServiceVersions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceVersions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_versions_service")
                            .from(ServiceVersions::Table, ServiceVersions::ServiceId)
                            .to(Services::Table, Services::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One label per service
        manager
            .create_index(
                Index::create()
                    .name("idx_service_versions_version_service")
                    .table(ServiceVersions::Table)
                    .col(ServiceVersions::Version)
                    .col(ServiceVersions::ServiceId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Service -> versions join
        manager
            .create_index(
                Index::create()
                    .name("idx_service_versions_service_id")
                    .table(ServiceVersions::Table)
                    .col(ServiceVersions::ServiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceVersions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ServiceVersions {
    Table,
    Id,
    Version,
    Changelog,
    ServiceId,
    CreatedAt,
    UpdatedAt,
}
