//! Service layer: record store, auth, media tooling, and the two storage
//! backends (S3 for videos, local assets for thumbnails).

pub mod asset_store;
pub mod auth_service;
pub mod media_service;
pub mod object_publisher;
pub mod video_store;
