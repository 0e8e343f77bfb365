//! Product and tag domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{CatalogEntry, Price, ProductId, StoreId, TagId};

/// A product listed by a store.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub title: String,
    pub price: Price,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    /// Tag names, alphabetical.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry for Product {
    fn product_id(&self) -> ProductId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn price(&self) -> Price {
        self.price
    }
}

/// A globally unique tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}
