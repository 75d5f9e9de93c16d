//! Token service - Issues and verifies signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user identity in a `user_id` claim.
//! Verification accepts HS256 only.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::USER_ID_CLAIM;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Signs and checks tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    /// Create a token service.
    ///
    /// With `ttl_hours` unset, tokens carry no `exp` claim and never expire.
    ///
    /// # Errors
    /// Returns an internal error when `ttl_hours` is not positive or does
    /// not fit in a duration.
    pub fn new(secret: &[u8], ttl_hours: Option<i64>) -> AppResult<Self> {
        let ttl = match ttl_hours {
            Some(hours) if hours > 0 => Some(Duration::try_hours(hours).ok_or_else(|| {
                AppError::internal(format!("Token lifetime of {} hours is out of range", hours))
            })?),
            Some(hours) => {
                return Err(AppError::internal(format!(
                    "Token lifetime must be positive, got {} hours",
                    hours
                )))
            }
            None => None,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = ttl_hours.is_some();
        if ttl_hours.is_some() {
            validation.set_required_spec_claims(&["exp"]);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Issue a token for the given user.
    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let exp = match self.ttl {
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or_else(|| AppError::internal("Token expiry overflows"))?
                    .timestamp(),
            ),
            None => None,
        };
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
    }

    /// Verify a token and return the user identity it carries.
    ///
    /// # Errors
    /// `InvalidToken` for malformed input, bad signature, a non-HS256 header
    /// or an expired token; `MalformedClaims` when `user_id` is absent or
    /// not a UUID.
    pub fn verify(&self, token: &str) -> AppResult<Uuid> {
        let token_data =
            decode::<HashMap<String, Value>>(token, &self.decoding_key, &self.validation)
                .map_err(|e| {
                    tracing::debug!("Token rejected: {}", e);
                    AppError::InvalidToken
                })?;

        token_data
            .claims
            .get(USER_ID_CLAIM)
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(AppError::MalformedClaims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn sign(header: Header, claims: &Value, secret: &[u8]) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_no_exp_without_ttl() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        let data =
            decode::<Claims>(&token, &DecodingKey::from_secret(SECRET), &validation).unwrap();
        assert!(data.claims.exp.is_none());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = TokenService::new(b"another-secret-key-also-32-chars-long", None).unwrap();
        let verifier = TokenService::new(SECRET, None).unwrap();
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(verifier.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        assert!(matches!(tokens.verify("not.a.jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(tokens.verify(""), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_other_hmac_width_is_rejected() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        let token = sign(
            Header::new(Algorithm::HS512),
            &json!({ "user_id": Uuid::new_v4() }),
            SECRET,
        );

        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_alg_none_is_rejected() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        let signed = tokens.issue(Uuid::new_v4()).unwrap();
        let payload = signed.split('.').nth(1).unwrap();
        // {"alg":"none","typ":"JWT"} with the signature stripped
        let token = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);

        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_missing_user_id_is_malformed() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        let token = sign(Header::default(), &json!({ "sub": "someone" }), SECRET);

        assert!(matches!(tokens.verify(&token), Err(AppError::MalformedClaims)));
    }

    #[test]
    fn test_non_uuid_user_id_is_malformed() {
        let tokens = TokenService::new(SECRET, None).unwrap();
        let token = sign(Header::default(), &json!({ "user_id": "42" }), SECRET);

        assert!(matches!(tokens.verify(&token), Err(AppError::MalformedClaims)));
    }

    #[test]
    fn test_expired_token_is_invalid_when_ttl_configured() {
        let tokens = TokenService::new(SECRET, Some(1)).unwrap();
        let long_ago = Utc::now().timestamp() - 10 * 3600;
        let token = sign(
            Header::default(),
            &json!({ "user_id": Uuid::new_v4(), "iat": long_ago, "exp": long_ago + 3600 }),
            SECRET,
        );

        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_ttl_requires_exp() {
        let tokens = TokenService::new(SECRET, Some(1)).unwrap();
        let token = sign(Header::default(), &json!({ "user_id": Uuid::new_v4() }), SECRET);

        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
        let fresh = tokens.issue(Uuid::new_v4()).unwrap();
        assert!(tokens.verify(&fresh).is_ok());
    }

    #[test]
    fn test_unusable_ttl_is_an_error() {
        for hours in [0, -1, i64::MAX / 2, i64::MAX] {
            let result = TokenService::new(SECRET, Some(hours));
            assert!(matches!(result, Err(AppError::Internal(_))), "{} hours", hours);
        }
    }
}
