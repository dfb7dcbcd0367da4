use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use base64::{engine::general_purpose, Engine};
use bytes::Bytes;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::models::movie::{CreateMovieRequest, Movie};
use crate::AppState;

/// GET /movies — the full catalog.
pub async fn list(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    let movies = state.movies.find_all().await?;
    Ok(Json(movies))
}

/// GET /movies/:title — a single movie, or null when no title matches.
pub async fn by_title(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    let movie = state.movies.find_by_title(&title).await?;
    Ok(Json(movie))
}

/// GET /movies/genre_description/:genre — the description string of the
/// first matching embedded genre.
pub async fn genre_description(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    match state.movies.find_genre(&genre).await? {
        Some(found) => Ok(Json(found.description)),
        None => Err(ApiError::NotFound(format!("{} was not found", genre))),
    }
}

/// GET /movies/director_description/:director — the embedded director of
/// the first matching movie.
pub async fn director_description(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Path(director): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    match state.movies.find_director(&director).await? {
        Some(found) => Ok(Json(found)),
        None => Err(ApiError::NotFound(format!("{} was not found", director))),
    }
}

/// POST /movies — upload the image to blob storage, then insert the movie
/// with the returned durable URL.
pub async fn create(
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<AppState>,
    Json(req): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate(auth, &state.config.auth)?;

    let image = decode_image_data(&req.image_data)?;
    let key = format!(
        "{}-{}.png",
        Uuid::new_v4(),
        chrono::Utc::now().timestamp_millis()
    );

    let image_path = state
        .storage
        .put_object(&key, image, "image/png")
        .await
        .map_err(ApiError::Internal)?;

    let movie = state
        .movies
        .insert(Movie {
            id: None,
            title: req.title,
            description: req.description,
            genre: req.genre,
            director: req.director,
            actors: req.actors,
            image_path,
            featured: req.featured,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Decode a base64 image payload, tolerating an optional
/// `data:image/...;base64,` prefix.
fn decode_image_data(image_data: &str) -> Result<Bytes, ApiError> {
    let encoded = match image_data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => image_data,
    };

    general_purpose::STANDARD
        .decode(encoded.trim())
        .map(Bytes::from)
        .map_err(|e| ApiError::BadRequest(format!("invalid base64 image data: {}", e)))
}
