//! Unit of Work pattern implementation.
//!
//! Centralizes store access and transaction lifecycle. Every logical
//! operation that writes runs inside `transaction`, and every store it
//! touches is bound to that transaction's handle.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};

use super::repositories::{ServiceStore, UserStore, VersionStore};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not object safe (generic methods); managers are generic over it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// User store on the shared pool, for reads outside a transaction
    fn users(&self) -> UserStore<'_, DatabaseConnection>;

    /// Service store on the shared pool, for reads outside a transaction
    fn services(&self) -> ServiceStore<'_, DatabaseConnection>;

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Store access within a transaction.
///
/// All operations performed through this context share one transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> UserStore<'_, DatabaseTransaction> {
        UserStore::new(self.txn)
    }

    pub fn services(&self) -> ServiceStore<'_, DatabaseTransaction> {
        ServiceStore::new(self.txn)
    }

    pub fn versions(&self) -> VersionStore<'_, DatabaseTransaction> {
        VersionStore::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> UserStore<'_, DatabaseConnection> {
        UserStore::new(&self.db)
    }

    fn services(&self) -> ServiceStore<'_, DatabaseConnection> {
        ServiceStore::new(&self.db)
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // SQLite has no per-transaction isolation settings
        let (isolation, access) = match self.db.get_database_backend() {
            DbBackend::Sqlite => (None, None),
            _ => (
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            ),
        };

        let txn = self
            .db
            .begin_with_config(isolation, access)
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside a transaction, binding the context to `$ctx`.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
