//! Note and photo database operations
//!
//! Every read is scoped to the owning account. A note that exists but belongs
//! to someone else looks exactly like a note that does not exist.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

use super::now_timestamp;

/// Content type reported for photos stored without one
pub const DEFAULT_PHOTO_CONTENT_TYPE: &str = "image/jpeg";
/// Filename reported for photos stored without one
pub const DEFAULT_PHOTO_FILENAME: &str = "photo.jpg";

/// Photo attached to a note. All three parts travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoPayload {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl PhotoPayload {
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// New note as submitted by its owner
#[derive(Debug, Clone)]
pub struct NewNote {
    pub latitude: f64,
    pub longitude: f64,
    pub text: String,
    pub photo: Option<PhotoPayload>,
}

/// Stored note without photo bytes
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub text: String,
    pub created_at: String,
}

/// List entry: note plus photo metadata, never the bytes
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NoteSummary {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub text: String,
    pub created_at: String,
    pub has_photo: bool,
    pub photo_filename: Option<String>,
    pub photo_content_type: Option<String>,
}

/// Photo bytes ready to be served
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    photo_data: Option<Vec<u8>>,
    photo_filename: Option<String>,
    photo_content_type: Option<String>,
}

/// Owner-scoped note store
pub struct NoteStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NoteStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new note for `owner_id`.
    ///
    /// The photo, if any, must be an `image/*` type. Validation happens before
    /// the single INSERT, so a rejected note leaves nothing behind.
    pub async fn create(&self, owner_id: i64, note: NewNote) -> Result<Note> {
        if let Some(photo) = &note.photo {
            if !photo.is_image() {
                return Err(AppError::NotAnImage(photo.content_type.clone()));
            }
        }

        let (photo_data, photo_filename, photo_content_type) = match note.photo {
            Some(photo) => (Some(photo.data), Some(photo.filename), Some(photo.content_type)),
            None => (None, None, None),
        };

        let created = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, latitude, longitude, text, created_at,
                               photo_data, photo_filename, photo_content_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, latitude, longitude, text, created_at
            "#,
        )
        .bind(owner_id)
        .bind(note.latitude)
        .bind(note.longitude)
        .bind(&note.text)
        .bind(now_timestamp())
        .bind(photo_data)
        .bind(photo_filename)
        .bind(photo_content_type)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// List an owner's notes, newest first
    pub async fn list(&self, owner_id: i64) -> Result<Vec<NoteSummary>> {
        let notes = sqlx::query_as::<_, NoteSummary>(
            r#"
            SELECT id, latitude, longitude, text, created_at,
                   photo_data IS NOT NULL AS has_photo,
                   photo_filename, photo_content_type
            FROM notes
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(notes)
    }

    /// Get the photo of one of the owner's notes
    pub async fn get_photo(&self, owner_id: i64, note_id: i64) -> Result<StoredPhoto> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT photo_data, photo_filename, photo_content_type
            FROM notes
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(note_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        // Missing note, foreign note and photo-less note all end here
        let not_found = || AppError::NotFound("Photo not found".to_string());
        let row = row.ok_or_else(not_found)?;
        let data = row.photo_data.ok_or_else(not_found)?;

        Ok(StoredPhoto {
            data,
            content_type: row
                .photo_content_type
                .unwrap_or_else(|| DEFAULT_PHOTO_CONTENT_TYPE.to_string()),
            filename: row
                .photo_filename
                .unwrap_or_else(|| DEFAULT_PHOTO_FILENAME.to_string()),
        })
    }

    /// Count an owner's notes
    pub async fn count(&self, owner_id: i64) -> Result<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes WHERE user_id = ?")
            .bind(owner_id)
            .fetch_one(self.pool)
            .await?;

        Ok(result.0)
    }
}
