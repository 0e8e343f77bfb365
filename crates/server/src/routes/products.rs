//! Seller product routes, scoped to the caller's store.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};

use storekeep_core::ProductId;
use storekeep_core::forms::ProductForm;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::services::{not_found_as, products, scope};
use crate::state::AppState;

/// GET /api/products
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    let products = ProductRepository::new(&mut conn)
        .list_for_store(store.id)
        .await?;
    Ok(Json(json!({ "products": products })))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<ProductForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut tx = state.pool().begin().await?;
    let store = scope::caller_store(&mut tx, user.id).await?;
    let valid = form.validate()?;

    let product = products::create_product(&mut tx, &store, valid).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    let product = ProductRepository::new(&mut conn)
        .get_scoped(id, store.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;
    Ok(Json(json!({ "product": product })))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(form): ApiJson<ProductForm>,
) -> Result<Json<Value>> {
    let mut tx = state.pool().begin().await?;
    let store = scope::caller_store(&mut tx, user.id).await?;
    let valid = form.validate()?;

    let product = products::update_product(&mut tx, &store, id, valid).await?;
    tx.commit().await?;

    Ok(Json(json!({ "product": product })))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    ProductRepository::new(&mut conn)
        .delete(id, store.id)
        .await
        .map_err(not_found_as("Product"))?;
    tracing::info!(product_id = %id, store_id = %store.id, "Product deleted");

    Ok(Json(json!({ "message": "Product deleted." })))
}
