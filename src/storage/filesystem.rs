use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::Storage;

/// Local-disk backend for development and tests. Objects land under the
/// root directory and are addressed through the configured public base URL.
pub struct FilesystemStorage {
    root_path: PathBuf,
    public_url: String,
}

impl FilesystemStorage {
    pub fn new(root_path: PathBuf, public_url: String) -> Self {
        Self {
            root_path,
            public_url,
        }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root_path.join(key)
    }
}

#[async_trait]
impl Storage for FilesystemStorage {
    async fn put_object(&self, key: &str, data: Bytes, _content_type: &str) -> Result<String> {
        let path = self.object_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create storage directory")?;
        }

        fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write object {}", path.display()))?;

        Ok(format!(
            "{}/{}",
            self.public_url.trim_end_matches('/'),
            key
        ))
    }

    async fn health_check(&self) -> Result<()> {
        fs::create_dir_all(&self.root_path)
            .await
            .context("Storage root is not writable")?;
        Ok(())
    }
}
