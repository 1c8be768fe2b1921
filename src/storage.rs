//! Object storage staging for canonical audio.
//!
//! The speech service consumes audio by URI, so the canonical WAV is
//! uploaded to a bucket under a job-scoped key before transcription.

use crate::error::{FalaError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Upload timeout; large WAVs over slow links still have to finish.
const UPLOAD_TIMEOUT_SECS: u64 = 300;

/// A durably addressable staged artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedObject {
    pub bucket: String,
    pub object_key: String,
}

impl StagedObject {
    /// URI consumed by the speech service.
    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object_key)
    }
}

/// Uploads a local artifact to durable, addressable storage.
#[async_trait]
pub trait ObjectStager: Send + Sync {
    /// Upload the file at `path` under `object_key`, overwriting any
    /// existing object at that key, and return the staged reference.
    async fn stage(&self, path: &Path, object_key: &str) -> Result<StagedObject>;
}

/// Google Cloud Storage stager using the JSON media-upload API.
pub struct GcsStager {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    token: String,
}

impl GcsStager {
    pub fn new(endpoint: &str, bucket: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl ObjectStager for GcsStager {
    #[instrument(skip(self, path), fields(object_key = %object_key))]
    async fn stage(&self, path: &Path, object_key: &str) -> Result<StagedObject> {
        let bytes = tokio::fs::read(path).await?;
        debug!("Uploading {} bytes to gs://{}", bytes.len(), self.bucket);

        let url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint, self.bucket, object_key
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "audio/wav")
            .body(bytes)
            .send()
            .await
            .map_err(|e| FalaError::Staging(format!("upload request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FalaError::Staging(format!("status {}: {}", status, body)));
        }

        let staged = StagedObject {
            bucket: self.bucket.clone(),
            object_key: object_key.to_string(),
        };

        info!("Staged artifact at {}", staged.uri());
        Ok(staged)
    }
}
