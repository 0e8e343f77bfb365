//! Seller store routes. Each user manages at most one active store.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use storekeep_core::forms::StoreForm;

use crate::db::{RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::services::scope;
use crate::state::AppState;

/// GET /api/stores/me
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    Ok(Json(json!({ "store": store })))
}

/// POST /api/stores
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<StoreForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let valid = form.validate()?;

    let mut conn = state.pool().acquire().await?;
    let mut stores = StoreRepository::new(&mut conn);
    if stores.get_active_for_user(user.id).await?.is_some() {
        return Err(AppError::Conflict(
            "Store already exists for this user.".to_string(),
        ));
    }

    let store = stores
        .create(user.id, &valid)
        .await
        .map_err(store_error)?;
    tracing::info!(store_id = %store.id, user_id = %user.id, "Store created");

    Ok((StatusCode::CREATED, Json(json!({ "store": store }))))
}

/// PUT /api/stores/me
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<StoreForm>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;
    let valid = form.validate()?;

    let store = StoreRepository::new(&mut conn)
        .update(store.id, &valid)
        .await
        .map_err(store_error)?;

    Ok(Json(json!({ "store": store })))
}

/// DELETE /api/stores/me
pub async fn archive(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::caller_store(&mut conn, user.id).await?;

    StoreRepository::new(&mut conn)
        .archive(store.id)
        .await
        .map_err(store_error)?;
    tracing::info!(store_id = %store.id, "Store archived");

    Ok(Json(json!({ "message": "Store archived." })))
}

fn store_error(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::Conflict(msg) => AppError::Conflict(msg),
        RepositoryError::NotFound => AppError::NotFound("Store not found.".to_string()),
        other => AppError::Database(other),
    }
}
