use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use secrecy::Secret;

use kinodex::config::{
    AuthSettings, DatabaseSettings, ServerSettings, Settings, StorageBackend, StorageSettings,
};
use kinodex::database::{MovieStore, UserStore};
use kinodex::storage::Storage;
use kinodex::{create_app, AppState};

/// In-memory Storage that records every put and hands back a fake URL.
#[derive(Default, Clone)]
pub struct MockStorage {
    puts: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded_puts(&self) -> Vec<(String, usize)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_object(&self, key: &str, data: Bytes, _content_type: &str) -> Result<String> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), data.len()));
        Ok(format!("https://mock.storage/{}", key))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 5000,
        },
        database: DatabaseSettings {
            uri: Secret::new("mongodb://127.0.0.1:27017".to_string()),
            database_name: "kinodex_test".into(),
        },
        storage: StorageSettings {
            backend: StorageBackend::Filesystem,
            bucket: String::new(),
            region: String::new(),
            endpoint: None,
            use_path_style: false,
            root: PathBuf::from("./storage"),
            public_url: "http://localhost:5000/images".into(),
        },
        auth: AuthSettings {
            jwt_secret: Secret::new("router-test-secret".to_string()),
            token_ttl_seconds: 3600,
        },
    }
}

/// Build the full application with a mock storage backend. The MongoDB
/// client is lazy, so routes that fail before their store call (auth,
/// validation, payload decoding) can be driven without a live database.
pub async fn test_app() -> axum::Router {
    let settings = test_settings();
    let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:27017")
        .await
        .expect("parse test connection string");
    let database = client.database(&settings.database.database_name);

    let state = AppState {
        movies: MovieStore::new(&database),
        users: UserStore::new(&database),
        config: settings,
        storage: Arc::new(MockStorage::new()),
    };

    create_app(state)
}

/// A bearer token the test app accepts.
pub fn valid_token() -> String {
    kinodex::auth::issue_token("alice1", &test_settings().auth).expect("issue test token")
}
