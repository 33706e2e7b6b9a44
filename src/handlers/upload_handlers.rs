//! HTTP handlers for the two media upload endpoints.
//!
//! Video flow: gate → multipart intake → stage to temp file → fast-start
//! repackage → orientation probe → publish to S3 → record finalization.
//! Thumbnail flow: gate → multipart intake → local asset write → record
//! finalization. Temp files are owned by RAII guards so they disappear on
//! every exit path.

use crate::{
    errors::AppError,
    handlers::guard::{authorize_video_access, parse_video_id},
    models::video::Video,
    services::{
        asset_store,
        media_service::classify_orientation,
        object_publisher::generate_object_key,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{Field, MultipartError},
    },
    http::HeaderMap,
};
use tempfile::TempPath;
use tokio::{fs::File, io::AsyncWriteExt};

/// Hard cap on a video upload body.
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 1 << 30; // 1 GiB

/// Hard cap on a thumbnail upload body.
pub const MAX_THUMBNAIL_UPLOAD_BYTES: usize = 10 << 20; // 10 MiB

/// `POST /api/videos/{video_id}/upload`
///
/// Accepts a single `video` multipart part (MP4 only), repackages it for
/// progressive playback, classifies its orientation, publishes it to the
/// bucket, and writes the resulting URL onto the record.
pub async fn upload_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Video>, AppError> {
    let video_id = parse_video_id(&video_id)?;
    let (_user_id, mut video) = authorize_video_access(&state, &headers, video_id).await?;

    // Stage the named part to a temp file; the guard removes it on drop.
    let mut staged: Option<(tempfile::NamedTempFile, String)> = None;
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("video") {
            continue;
        }

        let media_type = part_media_type(&field)?;
        if media_type != "video/mp4" {
            return Err(AppError::bad_request(
                "Invalid file type. Only MP4 videos are allowed.",
            ));
        }

        let tmp = tempfile::Builder::new()
            .prefix("clipserve-upload-")
            .suffix(".mp4")
            .tempfile()
            .map_err(|err| {
                tracing::error!("failed to create staging file: {}", err);
                AppError::internal("Failed to create temporary file")
            })?;

        let mut out = File::create(tmp.path()).await.map_err(|err| {
            tracing::error!("failed to open staging file: {}", err);
            AppError::internal("Failed to create temporary file")
        })?;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            out.write_all(&chunk).await.map_err(|err| {
                tracing::error!("failed to stage upload: {}", err);
                AppError::internal("Failed to copy video to temporary file")
            })?;
        }
        out.flush().await.map_err(|err| {
            tracing::error!("failed to flush staging file: {}", err);
            AppError::internal("Failed to copy video to temporary file")
        })?;

        staged = Some((tmp, media_type));
        break;
    }
    let (staged, media_type) =
        staged.ok_or_else(|| AppError::bad_request("Missing `video` file part"))?;

    let processed = state
        .media
        .repackage_faststart(staged.path())
        .await
        .map_err(|err| {
            tracing::error!("fast-start repackaging failed: {}", err);
            AppError::internal("Failed to process video for fast start")
        })?;
    // Own the processed file so it is removed on every exit path too.
    let processed = TempPath::from_path(processed);

    let dims = state
        .media
        .probe_dimensions(staged.path())
        .await
        .map_err(|err| {
            tracing::error!("stream probe failed: {}", err);
            AppError::internal("Failed to determine video aspect ratio")
        })?;
    let orientation = classify_orientation(dims);

    let key = generate_object_key(orientation).map_err(|err| {
        tracing::error!("key generation failed: {}", err);
        AppError::internal("Failed to generate object key")
    })?;

    state
        .publisher
        .put_file(&key, &processed, &media_type)
        .await
        .map_err(|err| {
            tracing::error!("object upload failed: {}", err);
            AppError::internal("Failed to upload video to object storage")
        })?;

    video.video_url = Some(state.publisher.url_for(&key));
    let updated = state.store.update_video(&video).await.map_err(|err| {
        // The object stays in the bucket unreferenced; log the key so an
        // operator can reap it.
        tracing::warn!("record update failed, object `{}` is orphaned: {}", key, err);
        AppError::internal("Failed to update video record")
    })?;

    Ok(Json(updated))
}

/// `POST /api/videos/{video_id}/thumbnail`
///
/// Accepts a single `thumbnail` multipart part (JPEG or PNG), writes it into
/// the public assets directory, and writes the resulting URL onto the record.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Video>, AppError> {
    let video_id = parse_video_id(&video_id)?;
    let (_user_id, mut video) = authorize_video_access(&state, &headers, video_id).await?;

    let mut accepted: Option<(axum::body::Bytes, &'static str)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("thumbnail") {
            continue;
        }

        let media_type = part_media_type(&field)?;
        let extension = asset_store::extension_for(&media_type).ok_or_else(|| {
            AppError::bad_request("Unsupported file type. Only JPEG and PNG are allowed.")
        })?;

        let data = field.bytes().await.map_err(multipart_error)?;
        accepted = Some((data, extension));
        break;
    }
    let (data, extension) =
        accepted.ok_or_else(|| AppError::bad_request("Missing `thumbnail` file part"))?;

    let file_name = state.assets.save(&data, extension).await.map_err(|err| {
        tracing::error!("thumbnail write failed: {}", err);
        AppError::internal("Failed to save thumbnail to disk")
    })?;

    video.thumbnail_url = Some(state.assets.url_for(&file_name));
    let updated = state.store.update_video(&video).await.map_err(|err| {
        tracing::warn!(
            "record update failed, asset `{}` is orphaned: {}",
            file_name,
            err
        );
        AppError::internal("Failed to update video record")
    })?;

    Ok(Json(updated))
}

/// Declared MIME essence of a part: parameters after `;` stripped, lowercased.
/// A part with no Content-Type at all is a 400.
fn part_media_type(field: &Field<'_>) -> Result<String, AppError> {
    let content_type = field
        .content_type()
        .ok_or_else(|| AppError::bad_request("Missing Content-Type for file part"))?;
    Ok(mime_essence(content_type))
}

fn mime_essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Body/parse failures (including the body-size cap) surface as bad requests.
fn multipart_error(err: MultipartError) -> AppError {
    tracing::debug!("multipart read failed: {}", err);
    AppError::bad_request("Unable to parse multipart form data")
}
