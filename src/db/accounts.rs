//! Account database operations

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

use super::now_timestamp;

/// Account record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// Account repository
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an account by id
    pub async fn get(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Find an account by exact (case-sensitive) email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Create an account. Fails with `EmailTaken` without writing anything
    /// if the email is already registered.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<Account> {
        let inserted = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (email, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(now_timestamp())
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an account and, by cascade, its notes
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count accounts registered under an email
    pub async fn count_by_email(&self, email: &str) -> Result<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.pool)
            .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = AccountRepository::new(&pool);

        let account = repo.create("asha@example.com", "$2b$04$hash").await.unwrap();
        assert!(account.id > 0);
        assert_eq!(account.email, "asha@example.com");

        let loaded = repo.get(account.id).await.unwrap().unwrap();
        assert_eq!(loaded.email, "asha@example.com");
        assert_eq!(loaded.created_at, account.created_at);

        let by_email = repo.find_by_email("asha@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let pool = test_pool().await;
        let repo = AccountRepository::new(&pool);

        let first = repo.create("a@example.com", "h").await.unwrap();
        let second = repo.create("b@example.com", "h").await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = test_pool().await;
        let repo = AccountRepository::new(&pool);

        repo.create("dup@example.com", "first").await.unwrap();
        let result = repo.create("dup@example.com", "second").await;

        assert!(matches!(result, Err(AppError::EmailTaken)));
        assert_eq!(repo.count_by_email("dup@example.com").await.unwrap(), 1);

        let stored = repo.find_by_email("dup@example.com").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "first");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_registrations_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("accounts.db").display());
        let pool = crate::db::create_pool(&url).await.unwrap();

        let tasks: Vec<_> = (0..100)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let repo = AccountRepository::new(&pool);
                    // The last twenty reuse earlier emails
                    let email = format!("user{}@example.com", i % 80);
                    repo.create(&email, "h").await
                })
            })
            .collect();

        let mut created = 0;
        let mut taken = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::EmailTaken) => taken += 1,
                Err(e) => panic!("unexpected registration failure: {:?}", e),
            }
        }

        assert_eq!(created, 80);
        assert_eq!(taken, 20);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 80);
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let pool = test_pool().await;
        let repo = AccountRepository::new(&pool);

        repo.create("Ravi@example.com", "h").await.unwrap();
        assert!(repo.find_by_email("ravi@example.com").await.unwrap().is_none());
        assert!(repo.create("ravi@example.com", "h").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let repo = AccountRepository::new(&pool);

        let account = repo.create("gone@example.com", "h").await.unwrap();
        assert!(repo.delete(account.id).await.unwrap());
        assert!(repo.get(account.id).await.unwrap().is_none());
        assert!(!repo.delete(account.id).await.unwrap());
    }
}
