//! Transliteration routes
//!
//! Endpoints:
//! - POST /transliterate/ - Transliterate typed text
//! - POST /transliterate/image - OCR an uploaded image, then transliterate it

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::translit::Transliteration;

#[derive(Debug, Deserialize)]
pub struct TransliterateRequest {
    pub source_text: String,
    #[serde(default)]
    pub source_script: Option<String>,
    pub target_script: String,
}

/// Create the transliteration router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transliterate", post(transliterate_text))
        .route("/transliterate/", post(transliterate_text))
        .route("/transliterate/image", post(transliterate_image))
}

/// POST /transliterate/
async fn transliterate_text(
    State(state): State<AppState>,
    Json(request): Json<TransliterateRequest>,
) -> Result<Json<Transliteration>> {
    let result = state.translit().transliterate_text(
        &request.source_text,
        request.source_script.as_deref(),
        Some(request.target_script.as_str()),
    )?;

    Ok(Json(result))
}

/// POST /transliterate/image
///
/// Multipart fields: the image `file`, `target_script` and an optional
/// `source_script`.
async fn transliterate_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Transliteration>> {
    let mut image = None;
    let mut source_script = None;
    let mut target_script = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        let read_error = |e: MultipartError| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
        };
        match name.as_str() {
            "file" => image = Some(field.bytes().await.map_err(read_error)?),
            "source_script" => source_script = Some(field.text().await.map_err(read_error)?),
            "target_script" => target_script = Some(field.text().await.map_err(read_error)?),
            _ => tracing::debug!("Ignoring multipart field '{}'", name),
        }
    }

    let image = image.ok_or_else(|| missing_field("file"))?;
    let target_script = target_script.ok_or_else(|| missing_field("target_script"))?;

    let result = state
        .translit()
        .transliterate_image(&image, source_script.as_deref(), Some(target_script.as_str()))
        .await?;

    Ok(Json(result))
}

fn missing_field(field: &str) -> AppError {
    AppError::BadRequest(format!("Missing field: {}", field))
}
