//! Repository layer - Data access abstraction
//!
//! Each store borrows a connection, so the same code runs against the pool
//! or inside a transaction.

pub(crate) mod entities;
mod service_repository;
mod user_repository;
mod version_repository;

pub use service_repository::ServiceStore;
pub use user_repository::UserStore;
pub use version_repository::VersionStore;
