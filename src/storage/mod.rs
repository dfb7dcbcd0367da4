use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{StorageBackend, StorageSettings};

/// Blob-storage collaborator: accepts raw bytes under a key and returns a
/// durable URL for them.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Store an object and return its public URL.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String>;

    /// Perform a health check on the storage backend.
    async fn health_check(&self) -> Result<()>;
}

/// Build the configured storage backend.
pub async fn from_settings(settings: &StorageSettings) -> Result<Arc<dyn Storage>> {
    match settings.backend {
        StorageBackend::S3 => Ok(Arc::new(s3::S3Storage::new(settings).await?)),
        StorageBackend::Filesystem => Ok(Arc::new(filesystem::FilesystemStorage::new(
            settings.root.clone(),
            settings.public_url.clone(),
        ))),
    }
}

pub mod filesystem;
pub mod s3;
