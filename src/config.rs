//! Configuration management for the Bharat server
//!
//! Everything is read from the environment once at startup (after `.env` is
//! loaded by the binary) and then shared read-only through [`AppState`].
//!
//! [`AppState`]: crate::state::AppState

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::ocr::OcrProvider;

/// Signing secret used when `JWT_SECRET_KEY` is unset. Development only.
pub const DEV_JWT_SECRET: &str = "super-secret-development-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub transliteration: TransliterationConfig,
    pub ocr: OcrConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` allows any origin
    pub allowed_origin: String,
}

#[derive(Debug, Clone)]
pub struct TransliterationConfig {
    pub default_source_script: String,
    pub default_target_script: String,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Providers in the order they are tried
    pub providers: Vec<OcrProvider>,
    /// Tesseract-style language hint, e.g. `eng+hin`
    pub languages: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite:./app.db".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_algorithm: Algorithm::HS256,
                token_ttl_minutes: 60,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            cors: CorsConfig {
                allowed_origin: "*".to_string(),
            },
            transliteration: TransliterationConfig {
                default_source_script: "Devanagari".to_string(),
                default_target_script: "IAST".to_string(),
            },
            ocr: OcrConfig {
                providers: vec![OcrProvider::Tesseract],
                languages: "eng+hin".to_string(),
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
                timeout_secs: 30,
            },
            uploads: UploadConfig {
                max_upload_bytes: 10 * 1024 * 1024,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET_KEY")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(defaults.auth.jwt_secret),
                jwt_algorithm: match env::var("JWT_ALGORITHM") {
                    Ok(value) => parse_algorithm(&value)?,
                    Err(_) => defaults.auth.jwt_algorithm,
                },
                token_ttl_minutes: parse_var(
                    "ACCESS_TOKEN_EXPIRE_MINUTES",
                    defaults.auth.token_ttl_minutes,
                )?,
                bcrypt_cost: parse_var("BCRYPT_COST", defaults.auth.bcrypt_cost)?,
            },
            cors: CorsConfig {
                allowed_origin: env::var("FRONTEND_ORIGIN").unwrap_or(defaults.cors.allowed_origin),
            },
            transliteration: TransliterationConfig {
                default_source_script: env::var("DEFAULT_SOURCE_SCRIPT")
                    .unwrap_or(defaults.transliteration.default_source_script),
                default_target_script: env::var("DEFAULT_TARGET_SCRIPT")
                    .unwrap_or(defaults.transliteration.default_target_script),
            },
            ocr: OcrConfig {
                providers: match env::var("OCR_PROVIDERS") {
                    Ok(value) => parse_providers(&value)?,
                    Err(_) => defaults.ocr.providers,
                },
                languages: env::var("OCR_LANGUAGES").unwrap_or(defaults.ocr.languages),
                ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env::var("OLLAMA_MODEL").unwrap_or(defaults.ocr.ollama_model),
                timeout_secs: parse_var("OCR_TIMEOUT_SECS", defaults.ocr.timeout_secs)?,
            },
            uploads: UploadConfig {
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.uploads.max_upload_bytes)?,
            },
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    // Only HMAC algorithms work with a shared secret
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(ConfigError::Invalid {
            var: "JWT_ALGORITHM",
            value: value.to_string(),
        }),
    }
}

fn parse_providers(value: &str) -> Result<Vec<OcrProvider>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "tesseract" => Ok(OcrProvider::Tesseract),
            "ollama" => Ok(OcrProvider::Ollama),
            _ => Err(ConfigError::Invalid {
                var: "OCR_PROVIDERS",
                value: value.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert!(config.auth.uses_dev_secret());
        assert_eq!(config.transliteration.default_source_script, "Devanagari");
        assert_eq!(config.transliteration.default_target_script, "IAST");
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("hs512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
    }

    #[test]
    fn test_parse_providers() {
        let providers = parse_providers("ollama, tesseract").unwrap();
        assert_eq!(providers, vec![OcrProvider::Ollama, OcrProvider::Tesseract]);
        assert!(parse_providers("tesseract,cloud").is_err());
        assert!(parse_providers("").unwrap().is_empty());
    }
}
