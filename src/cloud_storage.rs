use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    primitives::ByteStreamError,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CloudStorageError {
    #[error("S3 SDK error: {0}")]
    SdkError(String),
    #[error("ByteStream error: {0}")]
    ByteStream(#[from] ByteStreamError),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// S3 configuration for the lyric cache bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket_name: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: Option<String>, // For MinIO/S3-compatible services
}

impl S3Config {
    pub fn validate(&self) -> Result<(), CloudStorageError> {
        if self.bucket_name.trim().is_empty() {
            return Err(CloudStorageError::Config(
                "Bucket name cannot be empty".to_string(),
            ));
        }
        if self.region.trim().is_empty() {
            return Err(CloudStorageError::Config(
                "Region cannot be empty".to_string(),
            ));
        }
        if self.access_key_id.trim().is_empty() {
            return Err(CloudStorageError::Config(
                "Access key ID cannot be empty".to_string(),
            ));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(CloudStorageError::Config(
                "Secret access key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Key/value blob store (allows mocking for tests)
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), CloudStorageError>;
    /// `Ok(None)` when nothing is stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CloudStorageError>;
    async fn delete(&self, key: &str) -> Result<(), CloudStorageError>;
    async fn list(&self) -> Result<Vec<String>, CloudStorageError>;
    /// One-time provisioning of the bucket backing this store
    async fn create_bucket(&self, name: &str, region: &str) -> Result<(), CloudStorageError>;
}

/// Production S3 blob store
pub struct S3BlobStore {
    client: Client,
    bucket_name: String,
}

impl S3BlobStore {
    /// Create a new S3 client for the configured bucket
    pub async fn new(config: S3Config) -> Result<Self, CloudStorageError> {
        config.validate()?;

        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None, // session_token
            None, // expiration
            "lyricsense-env",
        );

        let mut aws_config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials);

        // Set custom endpoint if provided (for S3-compatible services)
        if let Some(endpoint) = config.endpoint_url {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;
        let client = Client::new(&aws_config);

        Ok(S3BlobStore {
            client,
            bucket_name: config.bucket_name,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), CloudStorageError> {
        debug!("S3BlobStore: Uploading {} ({} bytes)", key, data.len());

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(data.into())
            .content_type("application/octet-stream")
            .send()
            .await
            .map_err(|e| CloudStorageError::SdkError(format!("Put object failed: {}", e)))?;

        info!("S3BlobStore: Stored s3://{}/{}", self.bucket_name, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CloudStorageError> {
        debug!("S3BlobStore: Downloading s3://{}/{}", self.bucket_name, key);

        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return Ok(None);
                }
                return Err(CloudStorageError::SdkError(format!(
                    "Get object failed: {}",
                    service_error
                )));
            }
        };

        let data = response.body.collect().await?.into_bytes().to_vec();

        debug!("S3BlobStore: Downloaded {} bytes", data.len());
        Ok(Some(data))
    }

    async fn delete(&self, key: &str) -> Result<(), CloudStorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| CloudStorageError::SdkError(format!("Delete object failed: {}", e)))?;

        info!("S3BlobStore: Deleted s3://{}/{}", self.bucket_name, key);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, CloudStorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket_name)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| CloudStorageError::SdkError(format!("List objects failed: {}", e)))?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(keys)
    }

    async fn create_bucket(&self, name: &str, region: &str) -> Result<(), CloudStorageError> {
        let mut request = self.client.create_bucket().bucket(name);

        // us-east-1 is the default location and rejects an explicit constraint
        if region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        request.send().await.map_err(|e| {
            CloudStorageError::SdkError(format!(
                "Create bucket failed (the name may be taken, or you already own it): {}",
                e
            ))
        })?;

        info!("S3BlobStore: Created bucket {} in {}", name, region);
        Ok(())
    }
}
