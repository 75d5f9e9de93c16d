//! Service persistence, including the listing and joined-version queries.

use sea_orm::{
    sea_query::{Expr, LikeExpr},
    ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::{
    service::{self, ActiveModel, Entity as ServiceEntity},
    service_version::{self, Entity as VersionEntity},
};
use crate::domain::{ServiceListQuery, ServiceSummary, ServiceVersionRow, SortOrder};
use crate::errors::{AppError, AppResult};

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Service queries over a borrowed connection or transaction.
///
/// Every lookup is scoped to the owning user.
pub struct ServiceStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ServiceStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Number of services this owner has under `name`
    pub async fn count_by_name(&self, name: &str, owner: Uuid) -> AppResult<u64> {
        let count = ServiceEntity::find()
            .filter(service::Column::Name.eq(name))
            .filter(service::Column::UserId.eq(owner))
            .count(self.conn)
            .await?;
        Ok(count)
    }

    /// Whether `id` exists and belongs to `owner`
    pub async fn is_owned_by(&self, id: i32, owner: Uuid) -> AppResult<bool> {
        let count = ServiceEntity::find()
            .filter(service::Column::Id.eq(id))
            .filter(service::Column::UserId.eq(owner))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Insert a service; returns the number of rows inserted.
    pub async fn insert(&self, name: String, description: String, owner: Uuid) -> AppResult<u64> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(name),
            description: Set(description),
            user_id: Set(owner),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        ServiceEntity::insert(active_model)
            .exec_without_returning(self.conn)
            .await
            .map_err(|e| AppError::on_unique_violation(e, AppError::ServiceExists))
    }

    /// Owner's services with version counts, filtered, ordered and paged.
    pub async fn list(&self, owner: Uuid, query: &ServiceListQuery) -> AppResult<Vec<ServiceSummary>> {
        let order = Order::from(query.order);

        let mut select = ServiceEntity::find()
            .select_only()
            .column_as(service::Column::Id, "service_id")
            .column(service::Column::Name)
            .column(service::Column::Description)
            .column(service::Column::CreatedAt)
            .column(service::Column::UpdatedAt)
            .column_as(
                Expr::col((VersionEntity, service_version::Column::Id)).count(),
                "versions_count",
            )
            .left_join(VersionEntity)
            .filter(service::Column::UserId.eq(owner));

        if !query.name_filter.is_empty() {
            select = select.filter(service::Column::Name.like(substring_pattern(&query.name_filter)));
        }

        let rows = select
            .group_by(service::Column::Id)
            .order_by(service::Column::CreatedAt, order.clone())
            .order_by(service::Column::Id, order)
            .limit(query.limit)
            .offset(query.offset)
            .into_model::<ServiceSummary>()
            .all(self.conn)
            .await?;

        Ok(rows)
    }

    /// The service joined with each of its versions, oldest version first.
    pub async fn with_versions(&self, id: i32, owner: Uuid) -> AppResult<Vec<ServiceVersionRow>> {
        let rows = ServiceEntity::find()
            .select_only()
            .column_as(service::Column::Id, "service_id")
            .column(service::Column::Name)
            .column(service::Column::Description)
            .column_as(service_version::Column::Id, "sv_id")
            .column(service_version::Column::Version)
            .column(service_version::Column::Changelog)
            .left_join(VersionEntity)
            .filter(service::Column::Id.eq(id))
            .filter(service::Column::UserId.eq(owner))
            .order_by_asc(service_version::Column::Id)
            .into_model::<ServiceVersionRow>()
            .all(self.conn)
            .await?;

        Ok(rows)
    }

    /// Rename / redescribe an owned service; returns rows updated.
    pub async fn update(
        &self,
        id: i32,
        owner: Uuid,
        name: String,
        description: String,
    ) -> AppResult<u64> {
        let result = ServiceEntity::update_many()
            .col_expr(service::Column::Name, Expr::value(name))
            .col_expr(service::Column::Description, Expr::value(description))
            .col_expr(service::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(service::Column::Id.eq(id))
            .filter(service::Column::UserId.eq(owner))
            .exec(self.conn)
            .await
            .map_err(|e| AppError::on_unique_violation(e, AppError::ServiceExists))?;

        Ok(result.rows_affected)
    }

    /// Delete an owned service row; returns rows deleted.
    pub async fn delete(&self, id: i32, owner: Uuid) -> AppResult<u64> {
        let result = ServiceEntity::delete_many()
            .filter(service::Column::Id.eq(id))
            .filter(service::Column::UserId.eq(owner))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}

/// `LIKE` pattern matching `needle` literally anywhere in the column.
fn substring_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

const LIKE_ESCAPE: char = '\\';

