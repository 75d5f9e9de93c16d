//! HTTP request handlers.

pub mod auth_handler;
pub mod service_handler;
pub mod user_handler;
pub mod version_handler;

pub use auth_handler::auth_routes;
pub use service_handler::service_routes;
pub use user_handler::user_routes;
pub use version_handler::version_routes;

use crate::errors::{AppError, AppResult};

/// Parse a numeric path id; anything else is treated as a missing resource.
pub(crate) fn parse_resource_id(raw: &str) -> AppResult<i32> {
    raw.parse().map_err(|_| AppError::NotFound)
}
