use axum::{extract::State, response::IntoResponse, Json};

use crate::auth;
use crate::error::ApiError;
use crate::models::user::{LoginRequest, UserResponse};
use crate::AppState;

/// Exchange a username and password for a signed bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.find_by_username(&req.username).await?;

    // A missing account and a wrong password answer the same way.
    let user = match user {
        Some(user) if auth::verify_password(&req.password, &user.password_hash) => user,
        _ => return Err(ApiError::Unauthorized),
    };

    let token = auth::issue_token(&user.username, &state.config.auth)?;

    Ok(Json(serde_json::json!({
        "user": UserResponse::from(user),
        "token": token,
    })))
}
