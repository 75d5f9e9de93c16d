//! User persistence.

use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// User queries over a borrowed connection or transaction.
pub struct UserStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Number of users holding this email
    pub async fn count_by_email(&self, email: &str) -> AppResult<u64> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(self.conn)
            .await?;
        Ok(count)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(User::from))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await?;
        Ok(result.map(User::from))
    }

    /// Insert a user; a duplicate email surfaces as `EmailExists`.
    pub async fn insert(&self, email: String, password_hash: String) -> AppResult<User> {
        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let active_model = ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = UserEntity::insert(active_model)
            .exec_without_returning(self.conn)
            .await
            .map_err(|e| AppError::on_unique_violation(e, AppError::EmailExists))?;

        if inserted != 1 {
            return Err(AppError::internal(format!(
                "User insert affected {} rows",
                inserted
            )));
        }

        Ok(user)
    }

    /// Change a user's email; returns the number of rows updated.
    pub async fn update_email(&self, id: Uuid, email: String) -> AppResult<u64> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Email, Expr::value(email))
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(self.conn)
            .await
            .map_err(|e| AppError::on_unique_violation(e, AppError::EmailExists))?;

        Ok(result.rows_affected)
    }
}
