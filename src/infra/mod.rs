//! Infrastructure layer - External systems integration
//!
//! Database connection and migrations, the SeaORM stores, and the Unit of
//! Work that scopes them to transactions.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{ServiceStore, UserStore, VersionStore};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};
