//! Catalog resolver: product references to products of one store.

use sqlx::PgConnection;

use storekeep_core::catalog::ensure_resolved;
use storekeep_core::{ProductRefs, StoreId};

use super::ServiceError;
use crate::db::ProductRepository;
use crate::models::Product;

/// Resolve every reference to a product of `store_id`, all or nothing.
///
/// Matched rows are locked `FOR SHARE` until the caller's transaction ends,
/// so their prices cannot change before the order is written.
///
/// # Errors
///
/// Returns `ServiceError::Unresolved` if any reference is unknown, belongs to
/// another store, or (for titles) matches more than one product.
pub async fn resolve(
    conn: &mut PgConnection,
    store_id: StoreId,
    refs: &ProductRefs,
) -> Result<Vec<Product>, ServiceError> {
    let mut products = ProductRepository::new(conn);
    let found = match refs {
        ProductRefs::Ids(ids) => products.lock_by_ids(store_id, ids).await?,
        ProductRefs::Titles(titles) => products.lock_by_titles(store_id, titles).await?,
    };

    if let Err(unresolved) = ensure_resolved(refs, &found) {
        tracing::debug!(
            store_id = %store_id,
            missing = ?unresolved.missing,
            "Product references did not resolve"
        );
        return Err(unresolved.into());
    }

    Ok(found)
}
