//! S3-compatible storage client
//!
//! Wraps the AWS SDK for uploading artifacts and presigning their download URLs.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};

use crate::config::{PublishMode, StorageConfig};
use crate::error::PublishError;

use super::publisher::Publisher;
use super::types::{ArtifactName, RequestOrigin};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// S3-compatible durable publisher
///
/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct S3Publisher {
    client: Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3Publisher {
    /// Create a new S3 publisher from configuration
    pub async fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "barcode-label-server",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(s3_config);

        // Check the bucket up front, but only warn: uploads report their own errors
        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt uploads anyway.",
                    bucket,
                    e
                );
            }
        }

        Self {
            client,
            bucket,
            url_ttl: Duration::from_secs(config.signed_url_ttl_secs),
        }
    }

    /// Upload a PDF under `key`
    pub async fn put_pdf(&self, key: &str, bytes: Vec<u8>) -> Result<(), PublishError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(PDF_CONTENT_TYPE)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| PublishError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(key = %key, bucket = %self.bucket, bytes = size, "Uploaded artifact");
        Ok(())
    }

    /// Presign a GET for `key`, valid for the configured TTL
    pub async fn presigned_get_url(&self, key: &str) -> Result<String, PublishError> {
        let sign_error = |reason: String| PublishError::Sign {
            key: key.to_string(),
            reason,
        };

        let presigning = PresigningConfig::expires_in(self.url_ttl)
            .map_err(|e| sign_error(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| sign_error(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    fn mode(&self) -> PublishMode {
        PublishMode::S3
    }

    async fn publish(
        &self,
        name: &ArtifactName,
        bytes: Vec<u8>,
        _origin: Option<&RequestOrigin>,
    ) -> Result<String, PublishError> {
        self.put_pdf(name.as_str(), bytes).await?;
        self.presigned_get_url(name.as_str()).await
    }
}
