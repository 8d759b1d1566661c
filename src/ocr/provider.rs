//! OCR Providers
//!
//! Defines the provider trait and implementations for different OCR backends.

use std::io::Write;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;

use super::types::{OcrError, OcrProvider, OcrResult};

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on an image
    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<OcrResult, OcrError>;
}

/// Tesseract OCR provider, driven through the `tesseract` binary
pub struct TesseractProvider {
    binary: String,
}

impl TesseractProvider {
    pub fn new() -> Self {
        Self::with_binary("tesseract")
    }

    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

impl Default for TesseractProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<OcrResult, OcrError> {
        // Removed when dropped, including when a timeout cancels this call
        let input = write_scratch_file(image_data.to_vec()).await?;

        // Language data must be installed for every code in the hint (e.g. `hin`)
        let output = Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        Ok(OcrResult {
            text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            provider: OcrProvider::Tesseract,
        })
    }
}

async fn write_scratch_file(data: Vec<u8>) -> Result<NamedTempFile, OcrError> {
    tokio::task::spawn_blocking(move || {
        let mut file = tempfile::Builder::new().prefix("ocr_input_").tempfile()?;
        file.write_all(&data)?;
        file.flush()?;
        Ok::<_, std::io::Error>(file)
    })
    .await
    .map_err(|e| OcrError::ProcessingError(format!("Scratch file task failed: {}", e)))?
    .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))
}

/// Ollama vision model provider
pub struct OllamaProvider {
    client: reqwest::Client,
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for OllamaProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<OcrResult, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let prompt = format!(
            "Extract all text from this image exactly as written, keeping its original script. \
             Likely languages (Tesseract codes): {}. Return only the extracted text, nothing else.",
            language
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse response: {}", e)))?;

        let text = result["response"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(OcrResult {
            text,
            provider: OcrProvider::Ollama,
        })
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub response: Result<String, String>,
    pub available: bool,
    /// Stalls the availability check
    pub check_delay: Option<std::time::Duration>,
    pub delay: Option<std::time::Duration>,
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        if let Some(delay) = self.check_delay {
            tokio::time::sleep(delay).await;
        }
        self.available
    }

    async fn recognize(&self, _image_data: &[u8], _language: &str) -> Result<OcrResult, OcrError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.response {
            Ok(text) => Ok(OcrResult {
                text: text.clone(),
                provider: OcrProvider::Tesseract,
            }),
            Err(msg) => Err(OcrError::ProcessingError(msg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tesseract_binary() {
        let provider = TesseractProvider::with_binary("definitely-not-a-tesseract-binary");
        assert!(!provider.is_available().await);

        let result = provider.recognize(b"\x89PNG\r\n\x1a\n", "eng").await;
        assert!(matches!(result, Err(OcrError::ProcessingError(_))));
    }

    /// A stand-in `tesseract` that records its input path, then hangs
    #[cfg(unix)]
    fn hanging_tesseract(dir: &std::path::Path) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("tesseract");
        let body = format!(
            "#!/bin/sh\n\
             [ \"$1\" = --version ] && exit 0\n\
             echo \"$1\" > {dir}/input\n\
             sleep 1\n\
             touch {dir}/finished\n",
            dir = dir.display()
        );
        std::fs::write(&script, body).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancelled_recognition_cleans_up() {
        use std::sync::Arc;
        use std::time::Duration;

        use crate::ocr::OcrService;

        let dir = tempfile::tempdir().unwrap();
        let script = hanging_tesseract(dir.path());
        let provider: Arc<dyn OcrProviderTrait> =
            Arc::new(TesseractProvider::with_binary(&script.display().to_string()));
        let service = OcrService::with_providers(vec![provider], "hin", Duration::from_millis(500));

        let result = service.recognize(b"\x89PNG\r\n\x1a\n").await;
        assert!(matches!(result, Err(OcrError::Timeout(_))));

        let input = std::fs::read_to_string(dir.path().join("input")).unwrap();
        assert!(input.trim().contains("ocr_input_"));
        assert!(!std::path::Path::new(input.trim()).exists());

        // The killed child never reaches its last step
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!dir.path().join("finished").exists());
    }

    #[test]
    fn test_ollama_url_normalized() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llava");
        assert_eq!(provider.base_url, "http://localhost:11434");
        assert_eq!(provider.provider_type(), OcrProvider::Ollama);
    }
}
