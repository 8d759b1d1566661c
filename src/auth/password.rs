//! Password hashing and verification (bcrypt)
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool.

use crate::error::{AppError, Result};

/// Salted one-way password hashing with a tunable cost factor
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Verified against when the account does not exist, so unknown emails
    /// cost the same as wrong passwords
    dummy_hash: String,
}

impl PasswordHasher {
    pub async fn new(cost: u32) -> Result<Self> {
        let dummy_hash = hash_with_cost("timing-protection-dummy".to_string(), cost).await?;
        Ok(Self { cost, dummy_hash })
    }

    /// Hash a plaintext password. Every call uses a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String> {
        hash_with_cost(password.to_string(), self.cost).await
    }

    /// Check a password against a stored hash.
    ///
    /// A malformed hash is a mismatch, not an error.
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .unwrap_or(false)
    }

    /// Burn one verification against the dummy hash
    pub async fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash).await;
    }
}

async fn hash_with_cost(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}
