use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Raw upload archive. Carried in `AppState` as `Arc<dyn DocumentArchive>`.
#[async_trait]
pub trait DocumentArchive: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;
}

pub struct S3Archive {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Archive {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl DocumentArchive for S3Archive {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
