//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated user resolved from the bearer token.
///
/// Lives in the request extensions for the rest of that request, and is
/// copied onto the response so the request logger can report it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// Authentication middleware.
///
/// Verifies the token, then confirms the user it names still exists.
/// A missing header, a bad token and an unknown user are all 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let user_id = state.tokens.verify(token)?;

    match state.accounts.get_by_id(user_id).await {
        Ok(_) => {}
        Err(AppError::NotFound) => {
            tracing::debug!(%user_id, "Token names an unknown user");
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e),
    }

    let current_user = CurrentUser { id: user_id };
    request.extensions_mut().insert(current_user);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(current_user);
    Ok(response)
}

/// Extract the token from `Authorization: Bearer <token>`; any other shape is `None`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_TOKEN_PREFIX)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
