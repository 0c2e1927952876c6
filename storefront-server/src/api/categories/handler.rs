//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;
use shared::catalog::{CatalogError, DesiredProducts, Forest, SyncResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate, CategoryWithCount};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/categories - all categories with direct product counts
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<CategoryWithCount>>> {
    let categories = state.categories.list_with_counts().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/categories/tree - navigation forest
pub async fn tree(State(state): State<ServerState>) -> AppResult<ApiResponse<Forest>> {
    let forest = state.categories.tree().await?;
    Ok(ApiResponse::success(forest))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Category>> {
    let category = state.categories.get(id).await?;
    Ok(ApiResponse::success(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<ApiResponse<Category>> {
    let category = state.categories.create(payload).await?;
    Ok(ApiResponse::success(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<ApiResponse<Category>> {
    let category = state.categories.update(id, payload).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/categories/{id} - detaches products, children become roots
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.categories.delete(id).await?;
    Ok(ApiResponse::ok())
}

/// GET /api/categories/{id}/descendants - the category id plus all descendant ids
pub async fn descendants(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<i64>>> {
    let ids = state.categories.descendant_ids(id).await?;
    Ok(ApiResponse::success(ids))
}

/// GET /api/categories/{id}/assigned-products - ids of products directly carrying the category
pub async fn assigned_products(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<i64>>> {
    let ids = state.category_sync.assigned_products(id).await?;
    Ok(ApiResponse::success(ids))
}

/// POST /api/categories/{id}/assigned-products
///
/// Body: `{"productIds": [...]}`. FULL REPLACE: products currently carrying
/// the category but missing from `productIds` lose it.
pub async fn sync_assigned_products(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<ApiResponse<SyncResult>> {
    let ids = body
        .get("productIds")
        .or_else(|| body.get("product_ids"))
        .ok_or_else(|| CatalogError::InvalidInput("productIds is required".to_string()))?;
    let desired = DesiredProducts::from_json(ids)?;

    let result = state.category_sync.sync(id, &desired).await?;
    Ok(ApiResponse::success_with_message(result.message(), result))
}
