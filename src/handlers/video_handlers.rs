//! Handlers for the video record CRUD subset: create a draft, list own
//! records, fetch one record. Media attachment happens in `upload_handlers`.

use crate::{
    errors::AppError,
    handlers::guard::{authenticate, parse_video_id},
    services::video_store::StoreError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: Option<String>,
}

/// `POST /api/videos` — create a draft record owned by the caller.
///
/// The body is taken as a `Result` so a malformed payload produces the same
/// 400 JSON envelope as every other error. Authentication runs first, so a
/// bad body from an anonymous caller is still a 401.
pub async fn create_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("request body rejected: {}", rejection);
        AppError::bad_request("Invalid request body")
    })?;

    if req.title.trim().is_empty() {
        return Err(AppError::bad_request("Title must not be empty"));
    }

    let video = state
        .store
        .create_video(user_id, req.title, req.description)
        .await
        .map_err(|err| {
            tracing::error!("failed to create video record: {}", err);
            AppError::internal("Failed to create video record")
        })?;

    Ok((StatusCode::CREATED, Json(video)))
}

/// `GET /api/videos` — list the caller's records, newest first.
pub async fn list_videos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let videos = state.store.list_videos(user_id).await.map_err(|err| {
        tracing::error!("failed to list videos: {}", err);
        AppError::internal("Failed to list video records")
    })?;

    Ok(Json(videos))
}

/// `GET /api/videos/{video_id}` — fetch a single record. Records are public
/// metadata, so reads carry no ownership gate.
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state
        .store
        .get_video(video_id)
        .await
        .map_err(|err| match err {
            StoreError::VideoNotFound(_) => AppError::not_found("Video not found"),
            other => {
                tracing::error!("failed to load video {}: {}", video_id, other);
                AppError::internal("Could not load video record")
            }
        })?;

    Ok(Json(video))
}
