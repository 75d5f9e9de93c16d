//! Service version handlers.

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::parse_resource_id;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Create a version
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VersionRequest {
    #[validate(length(min = 2, message = "Version must be at least 2 characters"))]
    #[schema(example = "v1.0.0", min_length = 2)]
    pub version: String,
    #[serde(default)]
    #[schema(example = "Initial release")]
    pub changelog: Option<String>,
}

/// Create version routes (require authentication)
pub fn version_routes() -> Router<AppState> {
    Router::new()
        .route("/service/:id/version", post(create_version))
        .route("/service/:id/version/:version_id", delete(delete_version))
}

/// Add a version to one of the caller's services
#[utoipa::path(
    post,
    path = "/service/{id}/version",
    tag = "Versions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service id")),
    request_body = VersionRequest,
    responses(
        (status = 201, description = "Version created"),
        (status = 400, description = "Invalid input or label already used"),
        (status = 404, description = "Service absent or not owned")
    )
)]
pub async fn create_version(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<VersionRequest>,
) -> AppResult<Created<()>> {
    let service_id = parse_resource_id(&id)?;
    state
        .catalog
        .create_service_version(
            payload.version,
            payload.changelog.unwrap_or_default(),
            service_id,
            current_user.id,
        )
        .await?;
    Ok(Created(ApiResponse::message("Service version created")))
}

/// Delete one version
#[utoipa::path(
    delete,
    path = "/service/{id}/version/{version_id}",
    tag = "Versions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Service id"),
        ("version_id" = i32, Path, description = "Version id")
    ),
    responses(
        (status = 200, description = "Version deleted"),
        (status = 404, description = "Absent or not owned")
    )
)]
pub async fn delete_version(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, version_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    let service_id = parse_resource_id(&id)?;
    let version_id = parse_resource_id(&version_id)?;
    state
        .catalog
        .delete_service_version(current_user.id, service_id, version_id)
        .await?;
    Ok(ApiResponse::message("Service version deleted"))
}
