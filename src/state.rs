//! Shared application state handed to every handler via `Router::with_state`.

use crate::services::{
    asset_store::AssetStore, media_service::MediaTools, object_publisher::ObjectPublisher,
    video_store::VideoStore,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Video metadata record store.
    pub store: VideoStore,

    /// External media tooling (probe + fast-start repackage).
    pub media: Arc<dyn MediaTools>,

    /// Publisher for finished video files (S3-backed in production).
    pub publisher: Arc<dyn ObjectPublisher>,

    /// Local writer for public thumbnail assets.
    pub assets: AssetStore,

    /// Shared secret used to validate caller JWTs.
    pub jwt_secret: String,
}
