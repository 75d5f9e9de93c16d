//! Password hashing - the credential store.
//!
//! `Password` is the stored hash as a value object; `CredentialStore`
//! owns the Argon2 cost parameters and produces and checks hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordCost;
use crate::errors::{AppError, AppResult};

/// A stored one-way password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

/// Hashes and verifies user passwords with Argon2id.
#[derive(Clone)]
pub struct CredentialStore {
    params: Params,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .finish()
    }
}

impl CredentialStore {
    /// Create a store with fixed cost parameters.
    ///
    /// # Errors
    /// Returns an internal error if Argon2 rejects the parameters.
    pub fn new(cost: PasswordCost) -> AppResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, 1, None)
            .map_err(|e| AppError::internal(format!("Invalid password hash parameters: {}", e)))?;
        Ok(Self { params })
    }

    /// Hash a plain text password with a fresh salt.
    pub fn hash(&self, plain_text: &str) -> AppResult<Password> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(Password::from_hash(hash.to_string()))
    }

    /// Verify a plain text password against a stored hash.
    ///
    /// A hash that cannot be parsed verifies as `false`.
    pub fn verify(&self, plain_text: &str, stored: &Password) -> bool {
        match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => self
                .argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is unparseable: {}", e);
                false
            }
        }
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}
