//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{Email, UserId};

/// A seller or reviewer account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name, unique across users.
    pub username: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
