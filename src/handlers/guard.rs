//! Shared authentication/authorization gate for record-mutating endpoints.
//!
//! Both upload handlers (and the record CRUD subset) need the same sequence:
//! resolve the caller from the bearer token, fetch the target record, and
//! require ownership. It lives here once so no handler inlines its own copy.

use crate::{
    errors::AppError,
    models::video::Video,
    services::{auth_service, video_store::StoreError},
    state::AppState,
};
use axum::http::HeaderMap;
use uuid::Uuid;

/// Parse the `{video_id}` path segment.
///
/// Handlers take the segment as a raw string so a malformed id comes back as
/// the same 400 JSON envelope as every other error, not the extractor's
/// plaintext rejection.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid video id"))
}

/// Resolve the calling user from the `Authorization` header.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Uuid, AppError> {
    let token = auth_service::extract_bearer(headers).map_err(|err| {
        tracing::debug!("bearer extraction failed: {}", err);
        AppError::unauthorized("Missing or malformed bearer token")
    })?;

    auth_service::validate_token(token, &state.jwt_secret).map_err(|err| {
        tracing::debug!("token validation failed: {}", err);
        AppError::unauthorized("Invalid or expired token")
    })
}

/// Authenticate the caller, fetch the target record, and require ownership.
///
/// Every failure path returns before any side effect: 401 for credential
/// problems, 404 for a missing record, 403 when the record belongs to
/// someone else.
pub async fn authorize_video_access(
    state: &AppState,
    headers: &HeaderMap,
    video_id: Uuid,
) -> Result<(Uuid, Video), AppError> {
    let user_id = authenticate(state, headers)?;

    let video = state.store.get_video(video_id).await.map_err(|err| match err {
        StoreError::VideoNotFound(_) => AppError::not_found("Video not found"),
        other => {
            tracing::error!("failed to load video {}: {}", video_id, other);
            AppError::internal("Could not load video record")
        }
    })?;

    if video.user_id != user_id {
        return Err(AppError::forbidden("Not the owner of this video"));
    }

    Ok((user_id, video))
}
