//! Transliteration service
//!
//! Resolves script names, checks them against the transliterator and runs
//! text or OCR output through it.

use std::sync::Arc;

use serde::Serialize;

use crate::config::TransliterationConfig;
use crate::error::{AppError, Result};
use crate::ocr::{sniff_image, OcrService};

use super::engine::Transliterator;
use super::meaning::word_meaning;
use super::scheme::normalize_script_name;

/// Result of a transliteration, as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct Transliteration {
    pub source_text: String,
    pub source_script: String,
    pub target_script: String,
    pub transliterated_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_meaning: Option<String>,
}

#[derive(Clone)]
pub struct TransliterationService {
    transliterator: Arc<dyn Transliterator>,
    ocr: OcrService,
    default_source: String,
    default_target: String,
}

impl TransliterationService {
    pub fn new(
        config: &TransliterationConfig,
        transliterator: Arc<dyn Transliterator>,
        ocr: OcrService,
    ) -> Self {
        Self {
            transliterator,
            ocr,
            default_source: config.default_source_script.clone(),
            default_target: config.default_target_script.clone(),
        }
    }

    /// Canonical (source, target) names, rejecting any the transliterator
    /// does not know
    pub fn resolve_scripts(
        &self,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<(String, String)> {
        let source = normalize_script_name(source)
            .or_else(|| normalize_script_name(Some(self.default_source.as_str())))
            .unwrap_or_default();
        let target = normalize_script_name(target)
            .or_else(|| normalize_script_name(Some(self.default_target.as_str())))
            .unwrap_or_default();

        for script in [&source, &target] {
            if !self.transliterator.supports(script) {
                return Err(AppError::UnsupportedScript(script.clone()));
            }
        }

        Ok((source, target))
    }

    /// Transliterate typed text
    pub fn transliterate_text(
        &self,
        text: &str,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Transliteration> {
        let (source, target) = self.resolve_scripts(source, target)?;
        self.convert(text.to_string(), source, target)
    }

    /// Recognise the text in an image, then transliterate it
    pub async fn transliterate_image(
        &self,
        image: &[u8],
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Transliteration> {
        let format = sniff_image(image)
            .ok_or_else(|| AppError::BadRequest("Invalid image file".to_string()))?;

        let (source, target) = self.resolve_scripts(source, target)?;

        tracing::debug!(
            format = ?format,
            bytes = image.len(),
            languages = self.ocr.languages(),
            "Running OCR for transliteration"
        );

        let recognized = self.ocr.recognize(image).await?;
        self.convert(recognized.text, source, target)
    }

    fn convert(&self, text: String, source: String, target: String) -> Result<Transliteration> {
        let transliterated_text = self.transliterator.transliterate(&text, &source, &target)?;

        tracing::debug!(
            source_script = %source,
            target_script = %target,
            chars = text.chars().count(),
            "Transliterated text"
        );

        Ok(Transliteration {
            word_meaning: word_meaning(&text).map(str::to_string),
            source_text: text,
            source_script: source,
            target_script: target,
            transliterated_text,
        })
    }
}
