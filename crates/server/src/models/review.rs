//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{ProductId, Rating, ReviewId, UserId};

/// A user's rating of a product.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
