use axum::Router;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::submit_job))
        .route("/{transform}/{job}", get(handler::get_job))
}
