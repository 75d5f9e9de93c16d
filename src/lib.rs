//! Service Catalog - per-user registry of services and their versions.
//!
//! Users sign up and log in for a bearer token, then manage the services
//! they own and the versions attached to each service.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, password hashing, listing queries
//! - **services**: Account and catalog use cases, token issuance
//! - **infra**: Database, migrations, stores and the Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! service-catalog serve --port 8080
//!
//! # Run migrations
//! service-catalog migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{User, UserProfile};
pub use errors::{AppError, AppResult};
