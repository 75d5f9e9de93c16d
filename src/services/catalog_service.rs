//! Catalog service - Services and their versions.
//!
//! Owns (name, owner) and (version, service) uniqueness and the
//! versions-first cascade on service deletion. All lookups are owner-scoped:
//! a service that exists but belongs to someone else is reported as absent.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::single_row;
use crate::domain::{ServiceListQuery, ServiceSummary, ServiceVersionRow};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Catalog service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_service(&self, name: String, description: String, owner: Uuid) -> AppResult<()>;

    async fn list_services(&self, owner: Uuid, query: ServiceListQuery) -> AppResult<Vec<ServiceSummary>>;

    /// One row per version; empty when the service is absent or not owned
    async fn get_service_with_versions(
        &self,
        service_id: i32,
        owner: Uuid,
    ) -> AppResult<Vec<ServiceVersionRow>>;

    async fn update_service(
        &self,
        service_id: i32,
        owner: Uuid,
        name: String,
        description: String,
    ) -> AppResult<()>;

    /// Remove the service and all of its versions
    async fn delete_service(&self, service_id: i32, owner: Uuid) -> AppResult<()>;

    async fn create_service_version(
        &self,
        version: String,
        changelog: String,
        service_id: i32,
        owner: Uuid,
    ) -> AppResult<()>;

    async fn delete_service_version(&self, owner: Uuid, service_id: i32, version_id: i32) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn create_service(&self, name: String, description: String, owner: Uuid) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            if ctx.services().count_by_name(&name, owner).await? > 0 {
                return Err(AppError::ServiceExists);
            }
            let inserted = ctx.services().insert(name, description, owner).await?;
            single_row(inserted, AppError::internal("Service insert affected no rows"))
        })?;

        tracing::info!(user_id = %owner, "Service created");
        Ok(())
    }

    async fn list_services(&self, owner: Uuid, query: ServiceListQuery) -> AppResult<Vec<ServiceSummary>> {
        self.uow.services().list(owner, &query).await
    }

    async fn get_service_with_versions(
        &self,
        service_id: i32,
        owner: Uuid,
    ) -> AppResult<Vec<ServiceVersionRow>> {
        self.uow.services().with_versions(service_id, owner).await
    }

    async fn update_service(
        &self,
        service_id: i32,
        owner: Uuid,
        name: String,
        description: String,
    ) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            if !ctx.services().is_owned_by(service_id, owner).await? {
                return Err(AppError::NotFound);
            }
            let updated = ctx
                .services()
                .update(service_id, owner, name, description)
                .await?;
            single_row(updated, AppError::NotFound)
        })
    }

    async fn delete_service(&self, service_id: i32, owner: Uuid) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            if !ctx.services().is_owned_by(service_id, owner).await? {
                return Err(AppError::NotFound);
            }
            // Versions reference the service, so they go first
            let versions = ctx.versions().delete_for_service(service_id).await?;
            tracing::debug!(service_id, versions, "Deleted service versions");

            let deleted = ctx.services().delete(service_id, owner).await?;
            single_row(deleted, AppError::NotFound)
        })?;

        tracing::info!(service_id, user_id = %owner, "Service deleted");
        Ok(())
    }

    async fn create_service_version(
        &self,
        version: String,
        changelog: String,
        service_id: i32,
        owner: Uuid,
    ) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            if !ctx.services().is_owned_by(service_id, owner).await? {
                return Err(AppError::ServiceNotFound);
            }
            if ctx.versions().count_by_label(service_id, &version).await? > 0 {
                return Err(AppError::VersionExists);
            }
            let inserted = ctx.versions().insert(service_id, version, changelog).await?;
            single_row(inserted, AppError::internal("Version insert affected no rows"))
        })
    }

    async fn delete_service_version(&self, owner: Uuid, service_id: i32, version_id: i32) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            if !ctx.versions().is_owned_by(version_id, service_id, owner).await? {
                return Err(AppError::NotFound);
            }
            let deleted = ctx.versions().delete(version_id).await?;
            single_row(deleted, AppError::NotFound)
        })
    }
}
