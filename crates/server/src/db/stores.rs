//! Store repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use storekeep_core::forms::ValidStore;
use storekeep_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    user_id: UserId,
    name: String,
    logo_url: Option<String>,
    theme_color: Option<String>,
    description: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            logo_url: row.logo_url,
            theme_color: row.theme_color,
            description: row.description,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const STORE_COLUMNS: &str =
    "id, user_id, name, logo_url, theme_color, description, active, created_at, updated_at";

/// Map a violation of either partial unique index to a readable `Conflict`.
fn store_conflict(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let msg = if db_err.constraint() == Some("idx_store_active_owner") {
            "Store already exists for this user."
        } else {
            "A store with this name already exists."
        };
        return RepositoryError::Conflict(msg.to_owned());
    }
    RepositoryError::Database(e)
}

/// Repository for store database operations.
pub struct StoreRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> StoreRepository<'c> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Get the user's active store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM storekeep.store WHERE user_id = $1 AND active"
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get an active store by its exact public name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_name(&mut self, name: &str) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM storekeep.store WHERE name = $1 AND active"
        ))
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create an active store for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has an active
    /// store or the name is taken by another active store.
    pub async fn create(
        &mut self,
        user_id: UserId,
        store: &ValidStore,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r"
            INSERT INTO storekeep.store (user_id, name, logo_url, theme_color, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&store.name)
        .bind(store.logo_url.as_deref())
        .bind(store.theme_color.as_deref())
        .bind(store.description.as_deref())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(store_conflict)?;

        Ok(row.into())
    }

    /// Replace the editable fields of an active store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store is not active.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &mut self,
        id: StoreId,
        store: &ValidStore,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r"
            UPDATE storekeep.store
            SET name = $2, logo_url = $3, theme_color = $4, description = $5
            WHERE id = $1 AND active
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&store.name)
        .bind(store.logo_url.as_deref())
        .bind(store.theme_color.as_deref())
        .bind(store.description.as_deref())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(store_conflict)?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Archive a store (`active = false`). Products and orders are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store is not active.
    pub async fn archive(&mut self, id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE storekeep.store SET active = FALSE WHERE id = $1 AND active")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
