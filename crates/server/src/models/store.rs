//! Store domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{StoreId, UserId};

/// A seller's store.
///
/// A user owns at most one active store at a time. Deleting a store only
/// clears `active`; archived rows stay for the orders that reference them.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    pub id: StoreId,
    pub user_id: UserId,
    pub name: String,
    pub logo_url: Option<String>,
    pub theme_color: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
