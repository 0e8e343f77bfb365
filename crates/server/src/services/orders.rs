//! Order assembler.

use sqlx::PgConnection;

use storekeep_core::catalog::{ProductRefs, order_total};
use storekeep_core::forms::ValidOrder;
use storekeep_core::{FieldErrors, OrderId, OrderStatus, Price, UserId};

use super::{ServiceError, catalog, not_found_as};
use crate::db::OrderRepository;
use crate::db::orders::NewOrder;
use crate::models::{Order, Store};

/// Create an order against `store`.
///
/// Resolves the product references, totals their current prices and writes
/// the order with status `pending` plus one link per product. `placed_by` is
/// the seller entering the order, or `None` for public checkout.
///
/// # Errors
///
/// Returns `ServiceError::Unresolved` if the references do not all resolve
/// within the store, `ServiceError::Validation` if the total does not fit the
/// order column, or `ServiceError::Repository` on storage failure.
pub async fn create_order(
    conn: &mut PgConnection,
    store: &Store,
    placed_by: Option<UserId>,
    order: ValidOrder,
) -> Result<Order, ServiceError> {
    let products = catalog::resolve(&mut *conn, store.id, &order.products).await?;
    let total_price = order_total(&products);
    if total_price.amount() >= Price::max_total_exclusive() {
        let field = match order.products {
            ProductRefs::Ids(_) => "product_ids",
            ProductRefs::Titles(_) => "product_names",
        };
        return Err(FieldErrors::single(field, "Order total is too large.").into());
    }

    let created = OrderRepository::new(conn)
        .insert(
            NewOrder {
                store_id: store.id,
                user_id: placed_by,
                buyer_name: &order.buyer_name,
                buyer_email: &order.buyer_email,
                total_price,
            },
            products,
        )
        .await?;

    tracing::info!(
        order_id = %created.id,
        store_id = %store.id,
        total_price = %created.total_price,
        products = created.products.len(),
        public = placed_by.is_none(),
        "Order created"
    );

    Ok(created)
}

/// Set the status of an order in `store`.
///
/// # Errors
///
/// Returns `ServiceError::NotFound("Order")` if the order is not in the store.
pub async fn set_status(
    conn: &mut PgConnection,
    store: &Store,
    id: OrderId,
    status: OrderStatus,
) -> Result<Order, ServiceError> {
    let mut orders = OrderRepository::new(conn);
    orders
        .update_status(id, store.id, status)
        .await
        .map_err(not_found_as("Order"))?;

    tracing::info!(order_id = %id, status = %status, "Order status updated");

    orders
        .get_scoped(id, store.id)
        .await?
        .ok_or(ServiceError::NotFound("Order"))
}
