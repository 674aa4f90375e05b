use anyhow::Result;
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::config::S3Config;

/// Where original uploads are kept. Carried in `AppState` as `Arc<dyn OriginalArchive>`.
#[async_trait]
pub trait OriginalArchive: Send + Sync {
    /// Stores an upload and returns its object key.
    async fn store_original(
        &self,
        resume_id: Uuid,
        filename: &str,
        bytes: Bytes,
    ) -> Result<String>;

    /// Removes an object stored by `store_original`.
    async fn delete_original(&self, key: &str) -> Result<()>;
}

/// Object storage for original résumé uploads (MinIO locally, S3 in production).
#[derive(Clone)]
pub struct DocumentArchive {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl DocumentArchive {
    pub async fn connect(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "screener-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl OriginalArchive for DocumentArchive {
    /// Stores an upload under `resumes/{id}/{filename}` and returns the key.
    async fn store_original(
        &self,
        resume_id: Uuid,
        filename: &str,
        bytes: Bytes,
    ) -> Result<String> {
        let key = object_key(resume_id, filename);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type_for(filename))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Archived upload to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn delete_original(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 delete failed: {e}"))?;

        info!("Removed s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

fn object_key(resume_id: Uuid, filename: &str) -> String {
    // Keep only the final path component of client-supplied names.
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("upload");
    format!("resumes/{resume_id}/{base}")
}

fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else if lower.ends_with(".md") {
        "text/markdown"
    } else if lower.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
