//! Shared fixtures for handler tests: in-memory store, fake collaborators,
//! token minting, and multipart body construction.

use crate::services::media_service::{MediaError, MediaTools};
use crate::services::object_publisher::{ObjectPublisher, PublishError, object_public_url};
use crate::services::{asset_store::AssetStore, video_store::VideoStore};
use crate::state::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::{HeaderMap, HeaderValue, Request, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

#[derive(Serialize)]
struct Claims {
    iss: String,
    sub: String,
    exp: usize,
}

/// Headers carrying a freshly minted bearer token for `user`.
pub fn bearer_for(user: Uuid) -> HeaderMap {
    let claims = Claims {
        iss: "clipserve".into(),
        sub: user.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

/// Media fake reporting fixed 1920x1080 dimensions. `repackage_faststart`
/// copies the staging file like the real tool would and records every path
/// it touched so tests can assert cleanup afterwards.
pub struct FakeMedia {
    pub touched: Mutex<Vec<PathBuf>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self {
            touched: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaTools for FakeMedia {
    async fn probe_dimensions(&self, _path: &Path) -> Result<Option<(i64, i64)>, MediaError> {
        Ok(Some((1920, 1080)))
    }

    async fn repackage_faststart(&self, path: &Path) -> Result<PathBuf, MediaError> {
        let mut out = path.as_os_str().to_owned();
        out.push(".processed.mp4");
        let out = PathBuf::from(out);
        tokio::fs::copy(path, &out)
            .await
            .map_err(|source| MediaError::Launch {
                tool: "ffmpeg",
                source,
            })?;

        let mut touched = self.touched.lock().unwrap();
        touched.push(path.to_path_buf());
        touched.push(out.clone());
        Ok(out)
    }
}

/// Publisher fake: records published keys and checks the payload file exists
/// at publish time. `failing()` rejects every put.
pub struct FakePublisher {
    pub puts: Mutex<Vec<String>>,
    fail: bool,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl ObjectPublisher for FakePublisher {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        _content_type: &str,
    ) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Put("injected failure".into()));
        }
        if !path.exists() {
            return Err(PublishError::Put("missing upload payload".into()));
        }
        self.puts.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        object_public_url("clips", "us-east-1", key)
    }
}

/// AppState over an in-memory SQLite store with the given fakes.
pub async fn test_state(
    media: Arc<dyn MediaTools>,
    publisher: Arc<dyn ObjectPublisher>,
    assets_dir: &Path,
) -> AppState {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::query(
        "CREATE TABLE videos (
            id BLOB PRIMARY KEY,
            user_id BLOB NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            thumbnail_url TEXT,
            video_url TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    AppState {
        store: VideoStore::new(Arc::new(pool)),
        media,
        publisher,
        assets: AssetStore::new(assets_dir, 8091),
        jwt_secret: SECRET.into(),
    }
}

/// Build a `Multipart` extractor around a single file part. `content_type`
/// of `None` yields a part with no Content-Type header.
pub async fn multipart_with_part(
    field: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Multipart {
    const BOUNDARY: &str = "fixture-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"file.bin\"\r\n"
        )
        .as_bytes(),
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    Multipart::from_request(request, &()).await.unwrap()
}
