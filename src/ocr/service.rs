//! OCR Service
//!
//! Orchestrates OCR providers: tries them in configured order under a
//! per-call time bound.

use std::sync::Arc;
use std::time::Duration;

use crate::config::OcrConfig;

use super::{
    provider::{OcrProviderTrait, OllamaProvider, TesseractProvider},
    types::{OcrError, OcrProvider, OcrResult},
};

/// OCR service for uploaded photos
#[derive(Clone)]
pub struct OcrService {
    providers: Vec<Arc<dyn OcrProviderTrait>>,
    /// Language hint passed to every provider, e.g. `eng+hin`
    languages: String,
    timeout: Duration,
}

impl OcrService {
    /// Create the service from configuration
    pub fn new(config: &OcrConfig) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|provider| -> Arc<dyn OcrProviderTrait> {
                match provider {
                    OcrProvider::Tesseract => Arc::new(TesseractProvider::new()),
                    OcrProvider::Ollama => {
                        Arc::new(OllamaProvider::new(&config.ollama_url, &config.ollama_model))
                    }
                }
            })
            .collect();

        Self::with_providers(
            providers,
            &config.languages,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create the service around explicit providers
    pub fn with_providers(
        providers: Vec<Arc<dyn OcrProviderTrait>>,
        languages: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            providers,
            languages: languages.to_string(),
            timeout,
        }
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// Recognize text in an image with the first provider that succeeds.
    ///
    /// The availability check and the recognition share one time bound per
    /// provider.
    pub async fn recognize(&self, image_data: &[u8]) -> Result<OcrResult, OcrError> {
        let mut last_error = None;

        for provider in &self.providers {
            let attempt = tokio::time::timeout(self.timeout, async {
                if !provider.is_available().await {
                    return None;
                }
                Some(provider.recognize(image_data, &self.languages).await)
            })
            .await
            .unwrap_or_else(|_| Some(Err(OcrError::Timeout(self.timeout))));

            let Some(attempt) = attempt else {
                tracing::debug!("OCR provider {:?} unavailable", provider.provider_type());
                continue;
            };

            match attempt {
                Ok(result) => {
                    tracing::debug!(
                        provider = ?result.provider,
                        chars = result.text.chars().count(),
                        "OCR complete"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        "OCR provider {:?} failed: {}, trying next",
                        provider.provider_type(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OcrError::ProviderNotAvailable("No OCR providers available".to_string())
        }))
    }
}
