use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use bytes::Bytes;

use super::Storage;
use crate::config::StorageSettings;

pub struct S3Storage {
    client: S3Client,
    bucket: String,
    use_path_style: bool,
    endpoint: Option<String>,
}

impl S3Storage {
    /// Credentials come from the ambient AWS environment (env vars, profile,
    /// instance role); only region, bucket and endpoint are configured here.
    pub async fn new(settings: &StorageSettings) -> Result<Self> {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(settings.use_path_style);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        Ok(Self {
            client: S3Client::from_conf(builder.build()),
            bucket: settings.bucket.clone(),
            use_path_style: settings.use_path_style,
            endpoint: settings.endpoint.clone(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        match (&self.endpoint, self.use_path_style) {
            (Some(endpoint), true) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            _ => format!("https://{}.s3.amazonaws.com/{}", self.bucket, key),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .context("Failed to upload object to S3")?;

        Ok(self.object_url(key))
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .context("S3 bucket is not reachable")?;
        Ok(())
    }
}
