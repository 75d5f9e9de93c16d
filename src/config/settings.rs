//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_MAX_CONNECTIONS,
    DEFAULT_DATABASE_MIN_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_PASSWORD_HASH_ITERATIONS,
    DEFAULT_PASSWORD_HASH_MEMORY_KIB, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEV_JWT_SECRET,
    MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Connection pool settings
#[derive(Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_PASSWORD_HASH_MEMORY_KIB,
            iterations: DEFAULT_PASSWORD_HASH_ITERATIONS,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    jwt_secret: String,
    /// Token lifetime; `None` issues tokens without an `exp` claim
    pub jwt_expiration_hours: Option<i64>,
    pub password_cost: PasswordCost,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("password_cost", &self.password_cost)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment (after reading `.env`).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Fails when JWT_SECRET is missing in release builds or shorter than
    /// the minimum length, when JWT_EXPIRATION_HOURS is outside
    /// `1..=MAX_JWT_EXPIRATION_HOURS`, or when a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        let jwt_expiration_hours: Option<i64> = parse_optional(&lookup, "JWT_EXPIRATION_HOURS")?;
        if let Some(hours) = jwt_expiration_hours {
            if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) {
                return Err(AppError::internal(format!(
                    "JWT_EXPIRATION_HOURS must be between 1 and {}, got {}",
                    MAX_JWT_EXPIRATION_HOURS, hours
                )));
            }
        }

        let connect_timeout_secs = parse_or(
            &lookup,
            "DATABASE_CONNECT_TIMEOUT_SECS",
            DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database: DatabaseSettings {
                url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                )?,
                connect_timeout: Duration::from_secs(connect_timeout_secs),
            },
            jwt_secret,
            jwt_expiration_hours,
            password_cost: PasswordCost {
                memory_kib: parse_or(
                    &lookup,
                    "PASSWORD_HASH_MEMORY_KIB",
                    DEFAULT_PASSWORD_HASH_MEMORY_KIB,
                )?,
                iterations: parse_or(
                    &lookup,
                    "PASSWORD_HASH_ITERATIONS",
                    DEFAULT_PASSWORD_HASH_ITERATIONS,
                )?,
            },
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::internal(format!("{} has an invalid value: {}", key, raw))),
        _ => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}
