//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::CredentialStore;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{AccountManager, AccountService, CatalogManager, CatalogService, TokenService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Account service
    pub accounts: Arc<dyn AccountService>,
    /// Catalog service
    pub catalog: Arc<dyn CatalogService>,
    /// Token verification for the auth gate
    pub tokens: Arc<TokenService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the managers over one Unit of Work on the given database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret_bytes(),
            config.jwt_expiration_hours,
        )?);
        let credentials = CredentialStore::new(config.password_cost)?;

        let accounts = AccountManager::new(uow.clone(), credentials, tokens.clone())?;
        let catalog = CatalogManager::new(uow);

        Ok(Self::new(
            Arc::new(accounts),
            Arc::new(catalog),
            tokens,
            database,
        ))
    }

    /// Create state with manually injected services.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        catalog: Arc<dyn CatalogService>,
        tokens: Arc<TokenService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            accounts,
            catalog,
            tokens,
            database,
        }
    }
}
