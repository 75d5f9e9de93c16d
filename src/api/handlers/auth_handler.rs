//! Signup and login handlers.

use axum::{extract::State, routing::post, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// User email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 50, message = "Email must be at most 50 characters")
    )]
    #[schema(example = "jd@gmail.com", max_length = 50)]
    pub email: String,
    /// User password
    #[validate(length(min = 7, max = 15, message = "Password must be 7 to 15 characters"))]
    #[schema(example = "johndoe123", min_length = 7, max_length = 15)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 50, message = "Email must be at most 50 characters")
    )]
    #[schema(example = "jd@gmail.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 7, max = 15, message = "Password must be 7 to 15 characters"))]
    #[schema(example = "johndoe123")]
    pub password: String,
}

/// Returned after signup
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    #[schema(example = "jd@gmail.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub access_token: String,
}

/// Returned after login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = SignupResponse),
        (status = 400, description = "Invalid or taken email"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<Created<SignupResponse>> {
    let signed_up = state
        .accounts
        .signup(payload.email, payload.password)
        .await?;

    Ok(Created(ApiResponse::with_message(
        SignupResponse {
            email: signed_up.user.email,
            created_at: signed_up.user.created_at,
            access_token: signed_up.access_token,
        },
        "User created",
    )))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let access_token = state
        .accounts
        .login(payload.email, payload.password)
        .await?;

    Ok(ApiResponse::success(TokenResponse { access_token }))
}
