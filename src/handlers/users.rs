use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;

use crate::auth::{self, authenticate};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::models::user::{NewUser, UserPayload, UserResponse};
use crate::validation;
use crate::AppState;

fn digest_payload(payload: UserPayload) -> Result<NewUser, ApiError> {
    Ok(NewUser {
        username: payload.username,
        password_hash: auth::hash_password(&payload.password)?,
        email: payload.email,
        birthday: payload.birthday,
    })
}

/// POST /users — register a new account. Open endpoint; all field rules are
/// checked before the store is touched.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<UserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validation::check(&req)?;

    // Friendly duplicate check first; the unique index still backstops the
    // race between this read and the insert.
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::Conflict(format!("{} already exists", req.username)));
    }

    let username = req.username.clone();
    let user = match state.users.insert(digest_payload(req)?).await {
        Ok(user) => user,
        Err(StoreError::AlreadyExists) => {
            return Err(ApiError::Conflict(format!("{} already exists", username)))
        }
        Err(e) => return Err(e.into()),
    };

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users — every account.
pub async fn list(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    let users = state.users.find_all().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// GET /users/:username — a single account, or null when none matches.
pub async fn get(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    let user = state.users.find_by_username(&username).await?;
    Ok(Json(user.map(UserResponse::from)))
}

/// PUT /users/:username — replace the account fields. Same field rules as
/// registration; the favorites list is left as-is.
pub async fn update(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<UserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;
    validation::check(&req)?;

    match state.users.update(&username, digest_payload(req)?).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(ApiError::NotFound(format!("{} was not found", username))),
    }
}

/// POST /users/:username/movies/:movieId — append to the favorites list.
/// Duplicates are permitted; any string is accepted as a movie id.
pub async fn add_favorite(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    match state.users.push_favorite(&username, &movie_id).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(ApiError::NotFound(format!("{} was not found", username))),
    }
}

/// DELETE /users/:username/movies/:movieId — remove every occurrence of
/// the movie id from the favorites list.
pub async fn remove_favorite(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    match state.users.pull_favorite(&username, &movie_id).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(ApiError::NotFound(format!("{} was not found", username))),
    }
}

/// DELETE /users/:username — deregister the account.
pub async fn deregister(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    match state.users.delete(&username).await? {
        Some(_) => Ok(format!("{} was deleted", username)),
        None => Err(ApiError::NotFound(format!("{} was not found", username))),
    }
}
