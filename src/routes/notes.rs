//! Note routes
//!
//! Endpoints (all require a bearer token):
//! - POST /notes/add - Create a text note
//! - POST /notes/add-with-photo - Create a note with an attached photo (multipart)
//! - GET /notes/ - List the caller's notes, newest first
//! - GET /notes/:id/photo - Download a note's photo

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::auth::CurrentAccount;
use crate::db::{NewNote, Note, NoteStore, NoteSummary, PhotoPayload, DEFAULT_PHOTO_FILENAME};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub text: String,
}

/// Create the notes router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/", get(list_notes))
        .route("/notes/add", post(add_note))
        .route("/notes/add-with-photo", post(add_note_with_photo))
        .route("/notes/:id/photo", get(get_photo))
}

/// POST /notes/add
async fn add_note(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<AddNoteRequest>,
) -> Result<Json<Note>> {
    let note = NoteStore::new(state.db())
        .create(
            account.id,
            NewNote {
                latitude: request.latitude,
                longitude: request.longitude,
                text: request.text,
                photo: None,
            },
        )
        .await?;

    tracing::info!(account_id = account.id, note_id = note.id, "Note created");
    Ok(Json(note))
}

/// POST /notes/add-with-photo
///
/// Multipart fields: `text`, `latitude`, `longitude` and the `photo` file.
async fn add_note_with_photo(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    mut multipart: Multipart,
) -> Result<Json<NoteSummary>> {
    let mut text = None;
    let mut latitude = None;
    let mut longitude = None;
    let mut photo = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "text" => text = Some(field.text().await.map_err(bad_multipart)?),
            "latitude" => {
                let value = field.text().await.map_err(bad_multipart)?;
                latitude = Some(parse_coordinate("latitude", &value)?);
            }
            "longitude" => {
                let value = field.text().await.map_err(bad_multipart)?;
                longitude = Some(parse_coordinate("longitude", &value)?);
            }
            "photo" => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(DEFAULT_PHOTO_FILENAME)
                    .to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(bad_multipart)?;

                tracing::debug!(
                    filename = %filename,
                    content_type = %content_type,
                    bytes = data.len(),
                    "Received photo"
                );

                photo = Some(PhotoPayload {
                    data: data.to_vec(),
                    filename,
                    content_type,
                });
            }
            _ => tracing::debug!("Ignoring multipart field '{}'", name),
        }
    }

    let photo = photo.ok_or_else(|| missing_field("photo"))?;
    let photo_filename = photo.filename.clone();
    let photo_content_type = photo.content_type.clone();

    let note = NoteStore::new(state.db())
        .create(
            account.id,
            NewNote {
                latitude: latitude.ok_or_else(|| missing_field("latitude"))?,
                longitude: longitude.ok_or_else(|| missing_field("longitude"))?,
                text: text.ok_or_else(|| missing_field("text"))?,
                photo: Some(photo),
            },
        )
        .await?;

    tracing::info!(account_id = account.id, note_id = note.id, "Note with photo created");

    Ok(Json(NoteSummary {
        id: note.id,
        latitude: note.latitude,
        longitude: note.longitude,
        text: note.text,
        created_at: note.created_at,
        has_photo: true,
        photo_filename: Some(photo_filename),
        photo_content_type: Some(photo_content_type),
    }))
}

/// GET /notes/
async fn list_notes(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<NoteSummary>>> {
    let notes = NoteStore::new(state.db()).list(account.id).await?;
    Ok(Json(notes))
}

/// GET /notes/:id/photo
async fn get_photo(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(note_id): Path<i64>,
) -> Result<Response> {
    let photo = NoteStore::new(state.db())
        .get_photo(account.id, note_id)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, photo.content_type)
        .header(header::CONTENT_LENGTH, photo.data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", header_safe_filename(&photo.filename)),
        )
        .body(Body::from(photo.data))
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Field '{}' must be a number", field)))
}

fn missing_field(field: &str) -> AppError {
    AppError::BadRequest(format!("Missing field: {}", field))
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("Failed to read upload: {}", e))
}

/// Quotes, backslashes and anything outside printable ASCII become `_`
fn header_safe_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe_filename() {
        assert_eq!(header_safe_filename("photo.jpg"), "photo.jpg");
        assert_eq!(header_safe_filename("my \"best\".png"), "my _best_.png");
        assert_eq!(header_safe_filename("a\\b\r\n.png"), "a_b__.png");
        assert_eq!(header_safe_filename("ताज.jpg"), "___.jpg");
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("latitude", " 28.6139 ").unwrap(), 28.6139);
        assert_eq!(parse_coordinate("longitude", "-200").unwrap(), -200.0);
        assert!(matches!(
            parse_coordinate("latitude", "north"),
            Err(AppError::BadRequest(_))
        ));
    }
}
