//! Category API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static segment, registered before /{id}
        .route("/tree", get(handler::tree))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/descendants", get(handler::descendants))
        .route(
            "/{id}/assigned-products",
            get(handler::assigned_products).post(handler::sync_assigned_products),
        )
}
