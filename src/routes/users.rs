use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::users;
use crate::AppState;

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register).get(users::list))
        .route(
            "/users/:username",
            get(users::get).put(users::update).delete(users::deregister),
        )
        .route(
            "/users/:username/movies/:movie_id",
            post(users::add_favorite).delete(users::remove_favorite),
        )
}
