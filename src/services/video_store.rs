//! VideoStore — metadata record store for hosted videos, backed by SQLite.
//!
//! The store owns reads and writes of the `videos` table only. Media bytes
//! never pass through here; upload handlers persist them elsewhere and write
//! the resulting URL back onto the record.

use crate::models::video::Video;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("video `{0}` not found")]
    VideoNotFound(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Thin wrapper over the shared SQLite pool for video record operations.
#[derive(Clone)]
pub struct VideoStore {
    /// Shared SQLite connection pool used for metadata operations.
    pub db: Arc<SqlitePool>,
}

const VIDEO_COLUMNS: &str =
    "id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at";

impl VideoStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Fetch a video record by id.
    ///
    /// Returns VideoNotFound if missing.
    pub async fn get_video(&self, id: Uuid) -> StoreResult<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::VideoNotFound(id),
            other => StoreError::Sqlx(other),
        })
    }

    /// Insert a new draft record owned by `user_id`.
    ///
    /// The record starts with no media attached; the upload endpoints fill in
    /// the URL fields later.
    pub async fn create_video(
        &self,
        user_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> StoreResult<Video> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO videos (id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&*self.db)
        .await?;

        Ok(video)
    }

    /// Persist the mutable fields of a record and bump `updated_at`.
    ///
    /// Returns the row as stored, or VideoNotFound if the id has no row.
    pub async fn update_video(&self, video: &Video) -> StoreResult<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "UPDATE videos
             SET title = ?, description = ?, thumbnail_url = ?, video_url = ?, updated_at = ?
             WHERE id = ?
             RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(Utc::now())
        .bind(video.id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::VideoNotFound(video.id),
            other => StoreError::Sqlx(other),
        })
    }

    /// List all records owned by `user_id`, newest first.
    pub async fn list_videos(&self, user_id: Uuid) -> StoreResult<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(videos)
    }
}
