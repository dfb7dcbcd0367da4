use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Landing page
pub async fn landing() -> &'static str {
    "Welcome to the kinodex movie catalog API"
}

/// Health check endpoint
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
