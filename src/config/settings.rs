use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use secrecy::Secret;
use serde::Deserialize;
use url::Url;
use validator::Validate;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Settings {
    #[validate]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[validate]
    pub storage: StorageSettings,
    #[validate]
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerSettings {
    #[validate(custom = "validate_host")]
    pub host: String,
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// Full MongoDB connection string, e.g. `mongodb://127.0.0.1:27017`.
    pub uri: Secret<String>,
    pub database_name: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Filesystem,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "filesystem" => Ok(StorageBackend::Filesystem),
            other => Err(format!("Invalid storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    #[validate(custom = "validate_optional_url")]
    pub endpoint: Option<String>,
    pub use_path_style: bool,
    /// Root directory for the filesystem backend.
    pub root: PathBuf,
    /// Base URL under which filesystem objects are served.
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AuthSettings {
    pub jwt_secret: Secret<String>,
    #[validate(range(min = 300))]
    pub token_ttl_seconds: u64,
}

impl Settings {
    /// Load configuration from environment variables. A `.env` file is
    /// honored for development; nothing is hard-coded.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let settings = Settings {
            server: ServerSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            storage: StorageSettings::from_env()?,
            auth: AuthSettings::from_env()?,
        };

        settings
            .validate()
            .context("Configuration validation failed")?;

        Ok(settings)
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parsed("PORT", 5000)?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            uri: Secret::new(env_required("CONNECTION_URI")?),
            database_name: env_or("DATABASE_NAME", "kinodex"),
        })
    }
}

impl StorageSettings {
    pub fn from_env() -> Result<Self> {
        let backend = env_or("STORAGE_BACKEND", "s3")
            .parse::<StorageBackend>()
            .map_err(anyhow::Error::msg)?;

        let (bucket, region) = match backend {
            StorageBackend::S3 => (env_required("S3_BUCKET")?, env_required("S3_REGION")?),
            StorageBackend::Filesystem => (
                env_or("S3_BUCKET", String::new()),
                env_or("S3_REGION", String::new()),
            ),
        };

        Ok(Self {
            backend,
            bucket,
            region,
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            use_path_style: env_parsed("S3_USE_PATH_STYLE", false)?,
            root: PathBuf::from(env_or("STORAGE_ROOT", "./storage")),
            public_url: env_or("STORAGE_PUBLIC_URL", "http://localhost:5000/images"),
        })
    }
}

impl AuthSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            jwt_secret: Secret::new(env_required("JWT_SECRET")?),
            token_ttl_seconds: env_parsed("TOKEN_TTL_SECONDS", 604_800)?,
        })
    }
}

fn env_required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("Missing required environment variable {}", name))
}

fn env_or(name: &str, default: impl Into<String>) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for environment variable {}", name)),
        Err(_) => Ok(default),
    }
}

fn validate_host(host: &str) -> Result<(), validator::ValidationError> {
    if host.is_empty() {
        return Err(validator::ValidationError::new("invalid_host"));
    }
    Ok(())
}

fn validate_optional_url(url: &str) -> Result<(), validator::ValidationError> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_url"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "Filesystem".parse::<StorageBackend>().unwrap(),
            StorageBackend::Filesystem
        );
        assert!("gcs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn server_address_joins_host_and_port() {
        let server = ServerSettings {
            host: "127.0.0.1".into(),
            port: 5000,
        };
        assert_eq!(server.address(), "127.0.0.1:5000");
    }

    #[test]
    fn port_outside_range_fails_validation() {
        let server = ServerSettings {
            host: "0.0.0.0".into(),
            port: 0,
        };
        assert!(server.validate().is_err());
    }
}
