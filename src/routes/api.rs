use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::landing))
        .route("/health", get(handlers::health::check))
        .route("/login", post(handlers::auth::login))
        .merge(super::movies::movie_router())
        .merge(super::users::user_router())
}
