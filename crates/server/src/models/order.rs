//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{Email, OrderId, OrderStatus, Price, StoreId, UserId};

use super::Product;

/// An order placed against one store.
///
/// `total_price` is fixed when the order is created and is not recomputed
/// when products change or are deleted later.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    /// The seller who entered the order, or `None` for public checkout.
    pub user_id: Option<UserId>,
    pub buyer_name: String,
    pub buyer_email: Email,
    pub total_price: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub products: Vec<Product>,
}
