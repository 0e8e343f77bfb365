//! Access scoping: every seller operation runs against the caller's store.

use sqlx::PgConnection;

use storekeep_core::UserId;

use super::ServiceError;
use crate::db::StoreRepository;
use crate::models::Store;

/// Resolve the caller's active store.
///
/// # Errors
///
/// Returns `ServiceError::NotFound("Store")` if the caller has no active store.
pub async fn caller_store(conn: &mut PgConnection, user_id: UserId) -> Result<Store, ServiceError> {
    StoreRepository::new(conn)
        .get_active_for_user(user_id)
        .await?
        .ok_or(ServiceError::NotFound("Store"))
}

/// Resolve an active store by its public name.
///
/// # Errors
///
/// Returns `ServiceError::NotFound("Store")` if no active store has that name.
pub async fn public_store(conn: &mut PgConnection, name: &str) -> Result<Store, ServiceError> {
    StoreRepository::new(conn)
        .get_active_by_name(name)
        .await?
        .ok_or(ServiceError::NotFound("Store"))
}
