//! S3 object store adapter
//!
//! Talks to AWS S3 or any S3-compatible endpoint (MinIO, localstack) via
//! the official SDK. Credentials come from the standard AWS provider chain
//! unless the configuration pins a static key pair, which is the usual
//! setup against a local MinIO.

use crate::adapters::storage::traits::ObjectStore;
use crate::config::schema::StorageConfig;
use crate::domain::errors::StorageError;
use crate::domain::result::Result;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use secrecy::ExposeSecret;
use tracing::debug;

/// Object store backed by an S3 bucket
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the storage configuration
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&base);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            builder = builder.credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key,
                secret_key.expose_secret().as_ref(),
                None,
                None,
                "tidemark-config",
            ));
        }

        let client = Client::from_conf(builder.build());
        debug!(bucket = %config.bucket, region = %config.region, "Created S3 client");

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    /// The bucket this store writes into
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match response {
            Ok(output) => {
                let bytes = output.body.collect().await.map_err(|e| {
                    StorageError::ReadFailed {
                        key: key.to_string(),
                        message: format!("failed to read object body: {}", e),
                    }
                })?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::ReadFailed {
                        key: key.to_string(),
                        message: service_err.to_string(),
                    }
                    .into())
                }
            }
        }
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.into_service_error().to_string(),
            })?;
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(token) = continuation.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                StorageError::RequestFailed(format!(
                    "list failed for prefix '{}': {}",
                    prefix,
                    e.into_service_error()
                ))
            })?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }
}
