use axum::Router;
use axum::routing::put;
use crate::state::AppState;

pub mod dto;
pub mod fairplay;
pub mod handler;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{name}",
        put(handler::get_or_create_policy).delete(handler::delete_policy),
    )
}
