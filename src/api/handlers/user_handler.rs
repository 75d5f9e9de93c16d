//! Current-user handlers.

use axum::{extract::State, routing::get, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserProfile;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Email change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 50, message = "Email must be at most 50 characters")
    )]
    #[schema(example = "jane@gmail.com")]
    pub email: String,
}

/// Create user routes (require authentication)
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_current_user).put(update_current_user))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.accounts.get_by_id(current_user.id).await?;
    Ok(ApiResponse::success(profile))
}

/// Change the authenticated user's email
#[utoipa::path(
    put,
    path = "/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Email updated"),
        (status = 400, description = "Invalid or taken email"),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .accounts
        .update_email(payload.email, current_user.id)
        .await?;
    Ok(ApiResponse::message("User updated"))
}
