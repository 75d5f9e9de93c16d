//! Application services layer - Use cases and business logic.
//!
//! Managers orchestrate domain logic and the Unit of Work. Each write runs
//! in one transaction that commits only when exactly the expected rows
//! changed.

mod account_service;
mod catalog_service;
mod token_service;

pub use account_service::{AccountManager, AccountService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use token_service::{Claims, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use account_service::MockAccountService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_service::MockCatalogService;

use crate::errors::{AppError, AppResult};

/// Succeed only when exactly one row was affected.
///
/// Zero rows yields `on_zero`; more than one is an internal error.
pub(crate) fn single_row(affected: u64, on_zero: AppError) -> AppResult<()> {
    match affected {
        1 => Ok(()),
        0 => Err(on_zero),
        n => Err(AppError::internal(format!("Expected one row, {} affected", n))),
    }
}
