//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness
//! - [`categories`] - category CRUD, tree, descendants, assignment sync
//! - [`products`] - product CRUD, storefront listing, bulk import

pub mod categories;
pub mod health;
pub mod products;

use axum::Router;
use http::HeaderName;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(products::router())
}

/// Build the fully configured application with middleware and state
///
/// Used by the HTTP server and by oneshot calls in tests.
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .layer(
            ServiceBuilder::new()
                // Request ID - generated before tracing so spans can carry it
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
