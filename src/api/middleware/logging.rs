//! Request logging middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use super::CurrentUser;

/// Log method, path, status, latency and the authenticated user of every request.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = response.status().as_u16();
    let user_id = response
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.id.to_string())
        .unwrap_or_else(|| "-".to_string());

    if response.status().is_server_error() {
        tracing::error!(%method, %uri, status, latency_ms, %user_id, "request failed");
    } else {
        tracing::info!(%method, %uri, status, latency_ms, %user_id, "request");
    }

    response
}
