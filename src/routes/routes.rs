//! Defines routes for the video hosting API.
//!
//! ## Structure
//! - **Record endpoints**
//!   - `POST /api/videos` — create a draft record
//!   - `GET  /api/videos` — list the caller's records
//!   - `GET  /api/videos/{video_id}` — fetch one record
//!
//! - **Upload endpoints** (body limits applied per route)
//!   - `POST /api/videos/{video_id}/upload` — video file, MP4, ≤1 GiB
//!   - `POST /api/videos/{video_id}/thumbnail` — JPEG/PNG image, ≤10 MiB
//!
//! - `/assets` serves the public thumbnail directory.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        upload_handlers::{
            MAX_THUMBNAIL_UPLOAD_BYTES, MAX_VIDEO_UPLOAD_BYTES, upload_thumbnail, upload_video,
        },
        video_handlers::{create_video, get_video, list_videos},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeDir;

/// Build and return the router for all API routes.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes(assets_dir: &str) -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // record endpoints
        .route("/api/videos", post(create_video).get(list_videos))
        .route("/api/videos/{video_id}", get(get_video))
        // upload endpoints with their own body caps
        .route(
            "/api/videos/{video_id}/upload",
            post(upload_video).layer(DefaultBodyLimit::max(MAX_VIDEO_UPLOAD_BYTES)),
        )
        .route(
            "/api/videos/{video_id}/thumbnail",
            post(upload_thumbnail).layer(DefaultBodyLimit::max(MAX_THUMBNAIL_UPLOAD_BYTES)),
        )
        // public thumbnail assets
        .nest_service("/assets", ServeDir::new(assets_dir))
}
