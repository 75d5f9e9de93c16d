//! Shared fixtures for integration tests.
//!
//! Every fixture runs against a fresh in-memory SQLite database with all
//! migrations applied. The pool holds a single connection so the whole
//! test sees one database.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use service_catalog::api::{create_router, AppState};
use service_catalog::config::{DatabaseSettings, PasswordCost};
use service_catalog::domain::CredentialStore;
use service_catalog::infra::{Database, Persistence};
use service_catalog::services::{
    AccountManager, AccountService, CatalogManager, CatalogService, TokenService,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-at-least-32-bytes";

pub struct TestContext {
    pub database: Arc<Database>,
    pub uow: Arc<Persistence>,
    pub tokens: Arc<TokenService>,
    pub accounts: Arc<AccountManager<Persistence>>,
    pub catalog: Arc<CatalogManager<Persistence>>,
}

impl TestContext {
    pub async fn new() -> Self {
        let database = Arc::new(
            Database::connect(&DatabaseSettings {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                connect_timeout: Duration::from_secs(8),
            })
            .await
            .expect("in-memory database"),
        );

        let uow = Arc::new(Persistence::new(database.get_connection()));
        let tokens = Arc::new(TokenService::new(TEST_SECRET, None).expect("token service"));
        // Minimum argon2 cost keeps the suite fast
        let credentials = CredentialStore::new(PasswordCost {
            memory_kib: 1024,
            iterations: 1,
        })
        .expect("credential store");

        let accounts = Arc::new(
            AccountManager::new(uow.clone(), credentials, tokens.clone())
                .expect("account manager"),
        );
        let catalog = Arc::new(CatalogManager::new(uow.clone()));

        Self {
            database,
            uow,
            tokens,
            accounts,
            catalog,
        }
    }

    pub fn router(&self) -> Router {
        let accounts: Arc<dyn AccountService> = self.accounts.clone();
        let catalog: Arc<dyn CatalogService> = self.catalog.clone();
        create_router(AppState::new(
            accounts,
            catalog,
            self.tokens.clone(),
            self.database.clone(),
        ))
    }

    /// Create a user and return its id.
    pub async fn user(&self, email: &str) -> Uuid {
        self.accounts
            .create_user(email.to_string(), "johndoe123".to_string())
            .await
            .expect("create user")
            .id
    }

    /// Create a service for `owner` and return its id.
    pub async fn service(&self, owner: Uuid, name: &str) -> i32 {
        self.catalog
            .create_service(
                name.to_string(),
                "A service description long enough".to_string(),
                owner,
            )
            .await
            .expect("create service");

        self.catalog
            .list_services(
                owner,
                service_catalog::domain::ServiceListQuery::new(
                    100,
                    0,
                    name,
                    Default::default(),
                ),
            )
            .await
            .expect("list services")
            .into_iter()
            .find(|s| s.name == name)
            .expect("created service is listed")
            .service_id
    }
}

/// Send one request through the router and decode the body as JSON.
///
/// Empty bodies decode to `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
