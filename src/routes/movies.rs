use axum::{routing::get, Router};

use crate::handlers::movies;
use crate::AppState;

pub fn movie_router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        .route("/movies/:title", get(movies::by_title))
        .route(
            "/movies/genre_description/:genre",
            get(movies::genre_description),
        )
        .route(
            "/movies/director_description/:director",
            get(movies::director_description),
        )
}
