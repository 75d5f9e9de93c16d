//! Service handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::parse_resource_id;
use crate::api::extractors::{QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ServiceListQuery, ServiceVersionRow, SortOrder};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created, NoContent};

/// Create or update a service
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ServiceRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    #[schema(example = "backend", min_length = 3)]
    pub name: String,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    #[schema(example = "Handles every API request", min_length = 20)]
    pub description: String,
}

/// Listing query string
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListServicesParams {
    /// Page size; non-positive means 10
    pub limit: Option<i64>,
    /// Rows to skip; non-positive means 0
    pub offset: Option<i64>,
    /// Substring the name must contain
    pub name: Option<String>,
    /// `DESC` for newest first; anything else is oldest first
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

impl From<ListServicesParams> for ServiceListQuery {
    fn from(params: ListServicesParams) -> Self {
        ServiceListQuery::new(
            params.limit.unwrap_or(0),
            params.offset.unwrap_or(0),
            params.name.unwrap_or_default(),
            params
                .order_by
                .as_deref()
                .map(SortOrder::from_keyword)
                .unwrap_or_default(),
        )
    }
}

/// Create service routes (require authentication)
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/service", post(create_service))
        .route("/services", get(list_services))
        .route(
            "/service/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

/// Create a service owned by the caller
#[utoipa::path(
    post,
    path = "/service",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = ServiceRequest,
    responses(
        (status = 201, description = "Service created"),
        (status = 400, description = "Invalid input or name already used"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ServiceRequest>,
) -> AppResult<Created<()>> {
    state
        .catalog
        .create_service(payload.name, payload.description, current_user.id)
        .await?;
    Ok(Created(ApiResponse::message("Service created")))
}

/// List the caller's services
#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(ListServicesParams),
    responses(
        (status = 200, description = "Services with version counts", body = [crate::domain::ServiceSummary]),
        (status = 204, description = "No services match"),
        (status = 400, description = "Non-numeric limit or offset")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    QueryParams(params): QueryParams<ListServicesParams>,
) -> AppResult<Response> {
    let services = state
        .catalog
        .list_services(current_user.id, params.into())
        .await?;

    if services.is_empty() {
        return Ok(NoContent.into_response());
    }
    Ok(ApiResponse::success(services).into_response())
}

/// Get a service and its versions
#[utoipa::path(
    get,
    path = "/service/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "One row per version", body = [ServiceVersionRow]),
        (status = 404, description = "Absent or not owned")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ServiceVersionRow>>> {
    let service_id = parse_resource_id(&id)?;
    let rows = state
        .catalog
        .get_service_with_versions(service_id, current_user.id)
        .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(rows))
}

/// Rename or redescribe a service
#[utoipa::path(
    put,
    path = "/service/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service id")),
    request_body = ServiceRequest,
    responses(
        (status = 200, description = "Service updated"),
        (status = 400, description = "Invalid input or name already used"),
        (status = 404, description = "Absent or not owned")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ServiceRequest>,
) -> AppResult<ApiResponse<()>> {
    let service_id = parse_resource_id(&id)?;
    state
        .catalog
        .update_service(service_id, current_user.id, payload.name, payload.description)
        .await?;
    Ok(ApiResponse::message("Service updated"))
}

/// Delete a service and all of its versions
#[utoipa::path(
    delete,
    path = "/service/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 404, description = "Absent or not owned")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let service_id = parse_resource_id(&id)?;
    state
        .catalog
        .delete_service(service_id, current_user.id)
        .await?;
    Ok(ApiResponse::message("Service deleted"))
}
