use axum::Router;
use axum::routing::{delete, post};
use crate::state::AppState;

pub mod cache;
pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locators", post(handler::publish_locator))
        .route(
            "/streaming-endpoint/cache",
            delete(handler::invalidate_endpoint_cache),
        )
}
