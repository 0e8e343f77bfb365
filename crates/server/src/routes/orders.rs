//! Seller order routes, scoped to the caller's store.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};

use storekeep_core::OrderId;
use storekeep_core::forms::{OrderForm, OrderStatusForm};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::services::{not_found_as, orders, scope};
use crate::state::AppState;

/// GET /api/orders
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    let orders = OrderRepository::new(&mut conn)
        .list_for_store(store.id)
        .await?;
    Ok(Json(json!({ "orders": orders })))
}

/// POST /api/orders
///
/// The seller enters an order for their own store; the order records them as
/// `user_id`.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<OrderForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut tx = state.pool().begin().await?;
    let store = scope::caller_store(&mut tx, user.id).await?;
    let valid = form.validate()?;

    let order = orders::create_order(&mut tx, &store, Some(user.id), valid).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(json!({ "order": order }))))
}

/// GET /api/orders/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    let order = OrderRepository::new(&mut conn)
        .get_scoped(id, store.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found.".to_string()))?;
    Ok(Json(json!({ "order": order })))
}

/// PUT /api/orders/{id}
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(form): ApiJson<OrderStatusForm>,
) -> Result<Json<Value>> {
    let mut tx = state.pool().begin().await?;
    let store = scope::caller_store(&mut tx, user.id).await?;
    let status = form.validate()?;

    let order = orders::set_status(&mut tx, &store, id, status).await?;
    tx.commit().await?;

    Ok(Json(json!({ "order": order })))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    OrderRepository::new(&mut conn)
        .delete(id, store.id)
        .await
        .map_err(not_found_as("Order"))?;
    tracing::info!(order_id = %id, store_id = %store.id, "Order deleted");

    Ok(Json(json!({ "message": "Order deleted." })))
}
