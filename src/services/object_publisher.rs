//! Object publishing: pushes finished video files to the configured S3
//! bucket and derives their public retrieval URLs. The trait is the seam
//! that lets handler tests run without a bucket.

use crate::services::media_service::Orientation;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use rand::TryRngCore;
use rand::rngs::OsRng;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not open file for upload: {0}")]
    Body(#[from] aws_sdk_s3::primitives::ByteStreamError),
    #[error("object storage rejected the upload: {0}")]
    Put(String),
    #[error("system random source failed: {0}")]
    Rng(String),
}

/// Build an object key of the form `{orientation}/{16 random bytes as hex}.mp4`.
///
/// Randomness comes from the OS CSPRNG; uniqueness is probabilistic, so a
/// repeated upload always lands under a fresh key.
pub fn generate_object_key(orientation: Orientation) -> Result<String, PublishError> {
    let mut raw = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|err| PublishError::Rng(err.to_string()))?;
    Ok(format!("{}/{}.mp4", orientation.as_str(), hex::encode(raw)))
}

/// Public virtual-hosted-style URL for a key in the given bucket/region.
pub fn object_public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/// Narrow seam over the bucket client.
#[async_trait]
pub trait ObjectPublisher: Send + Sync {
    /// Stream a local file to the bucket under `key` with the declared
    /// content type attached.
    async fn put_file(&self, key: &str, path: &Path, content_type: &str)
    -> Result<(), PublishError>;

    /// Public retrieval URL for a published key.
    fn url_for(&self, key: &str) -> String;
}

/// Production publisher backed by the AWS S3 client.
pub struct S3Publisher {
    client: Client,
    bucket: String,
    region: String,
}

impl S3Publisher {
    pub fn new(client: Client, bucket: String, region: String) -> Self {
        Self {
            client,
            bucket,
            region,
        }
    }
}

#[async_trait]
impl ObjectPublisher for S3Publisher {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), PublishError> {
        let body = ByteStream::from_path(path).await?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|err| PublishError::Put(err.to_string()))?;
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        object_public_url(&self.bucket, &self.region, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_orientation_prefix_and_hex_name() {
        let key = generate_object_key(Orientation::Landscape).unwrap();
        let (prefix, name) = key.split_once('/').expect("namespaced key");
        assert_eq!(prefix, "landscape");
        let hex_part = name.strip_suffix(".mp4").expect("mp4 extension");
        assert_eq!(hex_part.len(), 32);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn keys_are_unique_across_calls() {
        let a = generate_object_key(Orientation::Other).unwrap();
        let b = generate_object_key(Orientation::Other).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn public_url_is_virtual_hosted_style() {
        let url = object_public_url("clips", "us-east-1", "portrait/abcd.mp4");
        assert_eq!(
            url,
            "https://clips.s3.us-east-1.amazonaws.com/portrait/abcd.mp4"
        );
    }
}
