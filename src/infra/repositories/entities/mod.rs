//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod service;
pub mod service_version;
pub mod user;
