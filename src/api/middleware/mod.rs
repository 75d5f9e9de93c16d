//! API middleware.

mod auth;
mod logging;

pub use auth::{auth_middleware, CurrentUser};
pub use logging::request_logger;
