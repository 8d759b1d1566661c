//! OCR Module
//!
//! Extracts text from uploaded photos through pluggable backends:
//! - Tesseract (local CLI, needs the language data for the configured hint)
//! - Ollama vision models (local LLM)

mod provider;
mod service;
mod types;

#[cfg(test)]
pub(crate) use provider::MockProvider;
pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider};
pub use service::OcrService;
pub use types::{OcrError, OcrProvider, OcrResult};

/// Recognise the container format of uploaded image bytes
pub fn sniff_image(data: &[u8]) -> Option<image::ImageFormat> {
    image::guess_format(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_image() {
        assert_eq!(sniff_image(b"\x89PNG\r\n\x1a\n\0\0"), Some(image::ImageFormat::Png));
        assert_eq!(sniff_image(b"\xFF\xD8\xFF\xE0\0\x10JFIF"), Some(image::ImageFormat::Jpeg));
        assert_eq!(sniff_image(b"plain text, not a picture"), None);
        assert_eq!(sniff_image(b""), None);
    }
}
