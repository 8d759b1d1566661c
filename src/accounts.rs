//! Registration and login

use sqlx::SqlitePool;

use crate::auth::{PasswordHasher, TokenService};
use crate::db::{Account, AccountRepository};
use crate::error::{AppError, Result};

/// Shortest password accepted at registration, in characters
pub const MIN_PASSWORD_CHARS: usize = 6;

pub struct AccountService<'a> {
    pool: &'a SqlitePool,
    hasher: &'a PasswordHasher,
    tokens: &'a TokenService,
}

impl<'a> AccountService<'a> {
    pub fn new(pool: &'a SqlitePool, hasher: &'a PasswordHasher, tokens: &'a TokenService) -> Self {
        Self { pool, hasher, tokens }
    }

    /// Create an account with a hashed credential
    pub async fn register(&self, email: &str, password: &str) -> Result<Account> {
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }

        let hash = self.hasher.hash(password).await?;
        let account = AccountRepository::new(self.pool).create(email, &hash).await?;

        tracing::info!(account_id = account.id, "Account registered");
        Ok(account)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let account = AccountRepository::new(self.pool).find_by_email(email).await?;

        let account = match account {
            Some(account) if self.hasher.verify(password, &account.password_hash).await => account,
            Some(_) => return Err(AppError::InvalidCredentials),
            None => {
                self.hasher.verify_dummy(password).await;
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue_default(account.id)?;
        tracing::info!(account_id = account.id, "Login succeeded");
        Ok(token)
    }

    /// Register and immediately issue a token for the new account
    pub async fn register_and_issue(&self, email: &str, password: &str) -> Result<String> {
        let account = self.register(email, password).await?;
        Ok(self.tokens.issue_default(account.id)?)
    }
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("A valid email address is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    struct Fixture {
        pool: SqlitePool,
        hasher: PasswordHasher,
        tokens: TokenService,
    }

    impl Fixture {
        async fn new() -> Self {
            Self {
                pool: test_pool().await,
                hasher: PasswordHasher::new(4).await.unwrap(),
                tokens: TokenService::new("test-secret", Algorithm::HS256, Duration::minutes(60)),
            }
        }

        fn service(&self) -> AccountService<'_> {
            AccountService::new(&self.pool, &self.hasher, &self.tokens)
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let fx = Fixture::new().await;
        let service = fx.service();

        let account = service.register("meera@example.com", "kolam-42").await.unwrap();
        assert_ne!(account.password_hash, "kolam-42");

        let token = service.login("meera@example.com", "kolam-42").await.unwrap();
        assert_eq!(fx.tokens.verify(&token).unwrap(), account.id);
    }

    #[tokio::test]
    async fn test_register_twice() {
        let fx = Fixture::new().await;
        let service = fx.service();

        service.register("dup@example.com", "secret1").await.unwrap();
        let second = service.register("dup@example.com", "secret2").await;

        assert!(matches!(second, Err(AppError::EmailTaken)));
        let repo = AccountRepository::new(&fx.pool);
        assert_eq!(repo.count_by_email("dup@example.com").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let fx = Fixture::new().await;
        let service = fx.service();

        let result = service.register("short@example.com", "12345").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        // Length is counted in characters, not bytes
        let five_chars = "पासवर";
        assert!(five_chars.len() > MIN_PASSWORD_CHARS);
        let result = service.register("short@example.com", five_chars).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(service.register("short@example.com", "पासवरx").await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_email_rejected() {
        let fx = Fixture::new().await;
        let service = fx.service();

        for email in ["", "no-at-sign", "@example.com", "user@", "a b@example.com"] {
            let result = service.register(email, "secret123").await;
            assert!(matches!(result, Err(AppError::BadRequest(_))), "{email}");
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let fx = Fixture::new().await;
        let service = fx.service();
        service.register("real@example.com", "secret123").await.unwrap();

        let wrong_password = service.login("real@example.com", "secret124").await.unwrap_err();
        let unknown_email = service.login("ghost@example.com", "secret123").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}
