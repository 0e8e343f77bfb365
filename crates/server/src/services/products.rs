//! Product create/update with tag reconciliation.

use sqlx::PgConnection;

use storekeep_core::ProductId;
use storekeep_core::forms::ValidProduct;

use super::{ServiceError, not_found_as, tags};
use crate::db::ProductRepository;
use crate::models::{Product, Store};

/// Create a product in `store`, attaching its tags.
///
/// # Errors
///
/// Returns `ServiceError::Repository` on storage failure.
pub async fn create_product(
    conn: &mut PgConnection,
    store: &Store,
    product: ValidProduct,
) -> Result<Product, ServiceError> {
    let id = ProductRepository::new(&mut *conn)
        .create(store.id, &product)
        .await?;

    if let Some(names) = product.tags.as_deref() {
        tags::set_product_tags(&mut *conn, id, names).await?;
    }

    tracing::info!(product_id = %id, store_id = %store.id, "Product created");
    fetch(conn, store, id).await
}

/// Update a product in `store`.
///
/// When `product.tags` is `Some`, the tag set is replaced (an empty list
/// clears it); when `None`, existing tags are kept.
///
/// # Errors
///
/// Returns `ServiceError::NotFound("Product")` if the product is not in the store.
pub async fn update_product(
    conn: &mut PgConnection,
    store: &Store,
    id: ProductId,
    product: ValidProduct,
) -> Result<Product, ServiceError> {
    ProductRepository::new(&mut *conn)
        .update(id, store.id, &product)
        .await
        .map_err(not_found_as("Product"))?;

    if let Some(names) = product.tags.as_deref() {
        tags::set_product_tags(&mut *conn, id, names).await?;
    }

    fetch(conn, store, id).await
}

async fn fetch(
    conn: &mut PgConnection,
    store: &Store,
    id: ProductId,
) -> Result<Product, ServiceError> {
    ProductRepository::new(conn)
        .get_scoped(id, store.id)
        .await?
        .ok_or(ServiceError::NotFound("Product"))
}
