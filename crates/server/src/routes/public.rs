//! Public storefront routes: browse an active store and check out as a guest.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use storekeep_core::forms::OrderForm;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::services::{orders, scope};
use crate::state::AppState;

/// Storefront filters. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct StorefrontQuery {
    /// Exact tag name.
    pub tag: Option<String>,
    /// Case-insensitive title substring.
    pub q: Option<String>,
}

impl StorefrontQuery {
    fn tag(&self) -> Option<&str> {
        non_empty(self.tag.as_deref())
    }

    fn title(&self) -> Option<&str> {
        non_empty(self.q.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// GET /stores/{name}
pub async fn storefront(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    Query(query): Query<StorefrontQuery>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let store = scope::public_store(&mut conn, &name).await?;
    let products = ProductRepository::new(&mut conn)
        .search(store.id, query.tag(), query.title())
        .await?;

    Ok(Json(json!({ "store": store, "products": products })))
}

/// POST /stores/{name}/orders
pub async fn checkout(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiJson(form): ApiJson<OrderForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut tx = state.pool().begin().await?;
    let store = scope::public_store(&mut tx, &name).await?;
    let valid = form.validate()?;

    let order = orders::create_order(&mut tx, &store, None, valid).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(json!({ "order": order }))))
}
