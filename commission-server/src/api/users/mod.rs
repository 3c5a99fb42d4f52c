//! Participant API module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/settings", patch(handler::update_settings))
        .route("/{id}/commission", get(handler::commission_detail))
        .route("/{id}/summary", get(handler::commission_summary))
}
