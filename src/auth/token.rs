//! Stateless bearer tokens (JWT)
//!
//! A token carries the account id as `sub` and an absolute `exp`. Nothing is
//! stored server-side: validity is signature plus expiry at verification time.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// JWT claims embedded in access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: account id
    pub sub: String,
    /// Expiry (unix timestamp)
    pub exp: i64,
    /// Issued at (unix timestamp)
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Forged, corrupt, or expired. Deliberately a single case.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Issue(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with the process-wide signing secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            default_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_algorithm,
            Duration::minutes(config.token_ttl_minutes),
        )
    }

    /// Issue a token for `account_id` that expires after `ttl`
    pub fn issue(&self, account_id: i64, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding)?)
    }

    /// Issue a token with the configured lifetime
    pub fn issue_default(&self, account_id: i64) -> Result<String, TokenError> {
        self.issue(account_id, self.default_ttl)
    }

    /// Verify signature and expiry, returning the account id
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(reason = ?e.kind(), "Token rejected");
            TokenError::Invalid
        })?;

        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}
