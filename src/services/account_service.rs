//! Account service - User identity and credential lifecycle.
//!
//! Owns email uniqueness. Signup and login combine the credential store
//! with the token service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::{single_row, TokenService};
use crate::domain::{CredentialStore, Password, SignedUpUser, User, UserProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Plain text hashed at startup so unknown-email logins still pay for a verify.
const TIMING_PLACEHOLDER: &str = "placeholder-password";

/// Account service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create the account and issue its first token
    async fn signup(&self, email: String, password: String) -> AppResult<SignedUpUser>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<String>;

    /// Create a user, rejecting a taken email with `EmailExists`
    async fn create_user(&self, email: String, password: String) -> AppResult<User>;

    /// Full user record, including the password hash
    async fn get_by_email(&self, email: &str) -> AppResult<User>;

    /// Public profile of a user
    async fn get_by_id(&self, id: Uuid) -> AppResult<UserProfile>;

    /// Change a user's email.
    ///
    /// The taken-email check does not exclude the caller, so re-submitting
    /// the current email reports `EmailExists`.
    async fn update_email(&self, new_email: String, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    credentials: CredentialStore,
    tokens: Arc<TokenService>,
    placeholder_hash: Password,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(
        uow: Arc<U>,
        credentials: CredentialStore,
        tokens: Arc<TokenService>,
    ) -> AppResult<Self> {
        let placeholder_hash = credentials.hash(TIMING_PLACEHOLDER)?;
        Ok(Self {
            uow,
            credentials,
            tokens,
            placeholder_hash,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn signup(&self, email: String, password: String) -> AppResult<SignedUpUser> {
        let user = self.create_user(email, password).await?;
        let access_token = self.tokens.issue(user.id)?;
        Ok(SignedUpUser { user, access_token })
    }

    async fn login(&self, email: String, password: String) -> AppResult<String> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify against a real hash either way so response time does not
        // reveal whether the email is registered
        let stored = user
            .as_ref()
            .map(User::password)
            .unwrap_or_else(|| self.placeholder_hash.clone());
        let password_valid = self.credentials.verify(&password, &stored);

        match user {
            Some(user) if password_valid => self.tokens.issue(user.id),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn create_user(&self, email: String, password: String) -> AppResult<User> {
        let password_hash = self.credentials.hash(&password)?.into_string();

        let user = with_transaction!(self.uow, |ctx| {
            if ctx.users().count_by_email(&email).await? > 0 {
                return Err(AppError::EmailExists);
            }
            ctx.users().insert(email, password_hash).await
        })?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.uow.users().find_by_email(email).await?.ok_or_not_found()
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<UserProfile> {
        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;
        Ok(user.profile())
    }

    async fn update_email(&self, new_email: String, id: Uuid) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            if ctx.users().count_by_email(&new_email).await? > 0 {
                return Err(AppError::EmailExists);
            }
            let updated = ctx.users().update_email(id, new_email).await?;
            single_row(updated, AppError::NotFound)
        })?;

        tracing::info!(user_id = %id, "User email updated");
        Ok(())
    }
}
