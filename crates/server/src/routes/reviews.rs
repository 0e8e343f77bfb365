//! Product review routes. Anyone may read; only the author may change a review.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};

use storekeep_core::forms::{NewReviewForm, ReviewForm};
use storekeep_core::{ProductId, ReviewId};

use crate::db::{RepositoryError, ReviewRepository};
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<NewReviewForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let (product_id, valid) = form.validate()?;

    let mut conn = state.pool().acquire().await?;
    let mut reviews = ReviewRepository::new(&mut conn);
    if !reviews.product_exists(product_id).await? {
        return Err(product_not_found());
    }
    let review = reviews.create(user.id, product_id, &valid).await?;

    Ok((StatusCode::CREATED, Json(json!({ "review": review }))))
}

/// GET /api/reviews/product/{id}
pub async fn list_for_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    let mut reviews = ReviewRepository::new(&mut conn);
    if !reviews.product_exists(product_id).await? {
        return Err(product_not_found());
    }
    let reviews = reviews.list_for_product(product_id).await?;

    Ok(Json(json!({ "reviews": reviews })))
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(form): ApiJson<ReviewForm>,
) -> Result<Json<Value>> {
    let valid = form.validate()?;

    let mut conn = state.pool().acquire().await?;
    let review = ReviewRepository::new(&mut conn)
        .update_by_author(id, user.id, &valid)
        .await
        .map_err(review_error)?;

    Ok(Json(json!({ "review": review })))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ReviewId>,
) -> Result<Json<Value>> {
    let mut conn = state.pool().acquire().await?;
    ReviewRepository::new(&mut conn)
        .delete_by_author(id, user.id)
        .await
        .map_err(review_error)?;

    Ok(Json(json!({ "message": "Review deleted." })))
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found.".to_string())
}

// Someone else's review looks the same as a missing one.
fn review_error(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Review not found.".to_string()),
        other => AppError::Database(other),
    }
}
