use std::sync::Arc;

use axum::Router;

pub mod auth;
pub mod config;
pub mod database;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod storage;
pub mod validation;

use database::{MovieStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieStore,
    pub users: UserStore,
    pub config: config::Settings,
    pub storage: Arc<dyn storage::Storage>,
}

/// Create the main Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::api::api_router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
