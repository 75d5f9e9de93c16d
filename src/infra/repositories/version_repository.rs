//! Service version persistence.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::{
    service,
    service_version::{self, ActiveModel, Entity as VersionEntity},
};
use crate::errors::{AppError, AppResult};

pub struct VersionStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VersionStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Number of versions of `service_id` labelled `version`
    pub async fn count_by_label(&self, service_id: i32, version: &str) -> AppResult<u64> {
        let count = VersionEntity::find()
            .filter(service_version::Column::ServiceId.eq(service_id))
            .filter(service_version::Column::Version.eq(version))
            .count(self.conn)
            .await?;
        Ok(count)
    }

    /// Whether the version sits under `service_id` and that service belongs to `owner`
    pub async fn is_owned_by(&self, version_id: i32, service_id: i32, owner: Uuid) -> AppResult<bool> {
        let count = VersionEntity::find()
            .join(JoinType::InnerJoin, service_version::Relation::Service.def())
            .filter(service_version::Column::Id.eq(version_id))
            .filter(service_version::Column::ServiceId.eq(service_id))
            .filter(service::Column::UserId.eq(owner))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Insert a version; returns the number of rows inserted.
    pub async fn insert(&self, service_id: i32, version: String, changelog: String) -> AppResult<u64> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            version: Set(version),
            changelog: Set(changelog),
            service_id: Set(service_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        VersionEntity::insert(active_model)
            .exec_without_returning(self.conn)
            .await
            .map_err(|e| AppError::on_unique_violation(e, AppError::VersionExists))
    }

    /// Delete every version of a service; returns rows deleted.
    pub async fn delete_for_service(&self, service_id: i32) -> AppResult<u64> {
        let result = VersionEntity::delete_many()
            .filter(service_version::Column::ServiceId.eq(service_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete(&self, version_id: i32) -> AppResult<u64> {
        let result = VersionEntity::delete_by_id(version_id)
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
