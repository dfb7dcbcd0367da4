use anyhow::{Context, Result};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;
use crate::error::ApiError;

/// Minimal identity claim carried by the bearer token. Expiry is the only
/// invalidation mechanism; there is no revocation list.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated account.
    pub sub: String,
    /// Expiration time as a unix timestamp.
    pub exp: usize,
}

/// Hash a plaintext password into a salted bcrypt digest for storage.
pub fn hash_password(plaintext: &str) -> Result<String> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

/// Compare a plaintext password against a stored digest. An unparseable
/// digest counts as a mismatch.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

/// Issue a signed, time-limited bearer token for the given username.
pub fn issue_token(username: &str, settings: &AuthSettings) -> Result<String> {
    let expiry = chrono::Utc::now() + chrono::Duration::seconds(settings.token_ttl_seconds as i64);
    let claims = Claims {
        sub: username.to_string(),
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes()),
    )
    .context("Failed to sign token")
}

/// Verify a bearer token and return its claims, or an unauthenticated
/// signal on any failure (bad signature, malformed, expired).
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("token verification failed: {e}");
        ApiError::Unauthorized
    })?;

    Ok(token_data.claims)
}

/// Precondition for every protected route: a valid bearer credential must
/// be present.
pub fn authenticate(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    settings: &AuthSettings,
) -> Result<Claims, ApiError> {
    let auth = auth.ok_or(ApiError::Unauthorized)?;
    verify_token(auth.token(), settings)
}
