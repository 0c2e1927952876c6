//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{
    BulkImportRequest, ImportReport, Product, ProductCreate, ProductQuery, ProductUpdate,
};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/products - storefront listing
///
/// Query: `category` (id or slug, includes descendants), `featured=true`,
/// `sort=newest|price_asc|price_desc`, `limit`
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = state.products.list(&query).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let product = state.products.get(id).await?;
    Ok(ApiResponse::success(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<Product>> {
    let product = state.products.create(payload).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<Product>> {
    let product = state.products.update(id, payload).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.products.delete(id).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/products/bulk - JSON bulk upsert by slug
pub async fn bulk_upsert(
    State(state): State<ServerState>,
    Json(payload): Json<BulkImportRequest>,
) -> AppResult<ApiResponse<ImportReport>> {
    let report = state.importer.import(payload.products).await?;
    Ok(ApiResponse::success(report))
}

/// POST /api/products/import - Shopify CSV export as the raw request body
pub async fn import_csv(
    State(state): State<ServerState>,
    body: String,
) -> AppResult<ApiResponse<ImportReport>> {
    let report = state.importer.import_csv(&body).await?;
    Ok(ApiResponse::success(report))
}
