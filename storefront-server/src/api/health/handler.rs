//! Health check handler

use axum::{Json, extract::State};

use crate::core::ServerState;

/// GET /health - liveness and basic service info
pub async fn health_check(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "storefront-server",
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": option_env!("GIT_HASH").unwrap_or("dev"),
        "environment": state.config.environment,
    }))
}
