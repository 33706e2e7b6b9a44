//! Represents a video record owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata record for a single hosted video.
///
/// The record is created as a draft (no media attached) and mutated by the
/// upload handlers, which fill in `video_url` and `thumbnail_url` after the
/// corresponding file has been persisted. The row never stores the media
/// bytes themselves.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Video {
    /// Internal UUID for DB indexing.
    pub id: Uuid,

    /// Foreign key linking to the owning user.
    pub user_id: Uuid,

    /// Display title.
    pub title: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// URL of the thumbnail served from the local assets directory.
    pub thumbnail_url: Option<String>,

    /// Public URL of the uploaded video object.
    pub video_url: Option<String>,

    /// Timestamp when the record was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}
