//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::error::Result;
use crate::ocr::OcrService;
use crate::translit::{BrahmicTransliterator, TransliterationService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    hasher: PasswordHasher,
    tokens: TokenService,
    translit: TransliterationService,
}

impl AppState {
    /// Create a new application state with the built-in transliterator and
    /// the configured OCR providers
    pub async fn new(config: Config, db: SqlitePool) -> Result<Self> {
        let ocr = OcrService::new(&config.ocr);
        let translit = TransliterationService::new(
            &config.transliteration,
            Arc::new(BrahmicTransliterator::new()),
            ocr,
        );

        Self::with_transliteration(config, db, translit).await
    }

    /// Create the state around an existing transliteration service
    pub async fn with_transliteration(
        config: Config,
        db: SqlitePool,
        translit: TransliterationService,
    ) -> Result<Self> {
        let hasher = PasswordHasher::new(config.auth.bcrypt_cost).await?;
        let tokens = TokenService::from_config(&config.auth);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                hasher,
                tokens,
                translit,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.inner.hasher
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get the transliteration service
    pub fn translit(&self) -> &TransliterationService {
        &self.inner.translit
    }
}
