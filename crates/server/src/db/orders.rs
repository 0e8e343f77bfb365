//! Order repository for database operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use storekeep_core::{Email, OrderId, OrderStatus, Price, ProductId, StoreId, UserId};

use super::RepositoryError;
use super::products::{PRODUCT_COLUMNS, ProductRow, with_tags};
use crate::models::{Order, Product};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    store_id: StoreId,
    user_id: Option<UserId>,
    buyer_name: String,
    buyer_email: String,
    total_price: Price,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, products: Vec<Product>) -> Result<Order, RepositoryError> {
        let buyer_email = Email::parse(&self.buyer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid buyer email in database: {e}"))
        })?;

        Ok(Order {
            id: self.id,
            store_id: self.store_id,
            user_id: self.user_id,
            buyer_name: self.buyer_name,
            buyer_email,
            total_price: self.total_price,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            products,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderProductRow {
    order_id: OrderId,
    #[sqlx(flatten)]
    product: ProductRow,
}

const ORDER_COLUMNS: &str = "id, store_id, user_id, buyer_name, buyer_email, total_price, \
     status, created_at, updated_at";

/// Fields of a new order row. The status is always the column default.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub store_id: StoreId,
    pub user_id: Option<UserId>,
    pub buyer_name: &'a str,
    pub buyer_email: &'a Email,
    pub total_price: Price,
}

/// Repository for order database operations.
pub struct OrderRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> OrderRepository<'c> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert an order row and link its products.
    ///
    /// Both statements run on the borrowed connection; run them inside a
    /// transaction so a failure leaves no partial order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn insert(
        &mut self,
        order: NewOrder<'_>,
        products: Vec<Product>,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO storekeep.order (store_id, user_id, buyer_name, buyer_email, total_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.store_id)
        .bind(order.user_id)
        .bind(order.buyer_name)
        .bind(order.buyer_email.as_str())
        .bind(order.total_price)
        .fetch_one(&mut *self.conn)
        .await?;

        let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        sqlx::query(
            r"
            INSERT INTO storekeep.order_product (order_id, product_id)
            SELECT $1, product_id FROM UNNEST($2::int4[]) AS product_id
            ",
        )
        .bind(row.id)
        .bind(&product_ids)
        .execute(&mut *self.conn)
        .await?;

        row.into_order(products)
    }

    /// List a store's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_store(&mut self, store_id: StoreId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM storekeep.order
            WHERE store_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(store_id)
        .fetch_all(&mut *self.conn)
        .await?;

        self.hydrate(rows).await
    }

    /// Get an order by ID within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_scoped(
        &mut self,
        id: OrderId,
        store_id: StoreId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"SELECT {ORDER_COLUMNS} FROM storekeep.order WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.pop())
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order is not in the store.
    pub async fn update_status(
        &mut self,
        id: OrderId,
        store_id: StoreId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query(r"UPDATE storekeep.order SET status = $3 WHERE id = $1 AND store_id = $2")
                .bind(id)
                .bind(store_id)
                .bind(status)
                .execute(&mut *self.conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an order and its product links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order is not in the store.
    pub async fn delete(&mut self, id: OrderId, store_id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM storekeep.order WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Attach each order's products (with tags).
    async fn hydrate(&mut self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<OrderId> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, OrderProductRow>(&format!(
            r"
            SELECT op.order_id, {PRODUCT_COLUMNS}
            FROM storekeep.order_product op
            JOIN storekeep.product p ON p.id = op.product_id
            WHERE op.order_id = ANY($1)
            ORDER BY op.order_id, p.id
            "
        ))
        .bind(&order_ids)
        .fetch_all(&mut *self.conn)
        .await?;

        let (owners, product_rows): (Vec<OrderId>, Vec<ProductRow>) = links
            .into_iter()
            .map(|link| (link.order_id, link.product))
            .unzip();
        let products = with_tags(&mut *self.conn, product_rows).await?;

        let mut by_order: HashMap<OrderId, Vec<Product>> = HashMap::new();
        for (order_id, product) in owners.into_iter().zip(products) {
            by_order.entry(order_id).or_default().push(product);
        }

        rows.into_iter()
            .map(|row| {
                let products = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(products)
            })
            .collect()
    }
}
