//! Product repository for database operations.
//!
//! Every query is filtered by `store_id`; a product of another store is
//! indistinguishable from a missing one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use storekeep_core::forms::ValidProduct;
use storekeep_core::{Price, ProductId, StoreId};

use super::RepositoryError;
use super::tags::TagRepository;
use crate::models::Product;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: ProductId,
    pub(crate) store_id: StoreId,
    pub(crate) title: String,
    pub(crate) price: Price,
    pub(crate) description: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) in_stock: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub(crate) fn into_product(self, tags: Vec<String>) -> Product {
        Product {
            id: self.id,
            store_id: self.store_id,
            title: self.title,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            in_stock: self.in_stock,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub(crate) const PRODUCT_COLUMNS: &str = "p.id, p.store_id, p.title, p.price, p.description, \
     p.image_url, p.in_stock, p.created_at, p.updated_at";

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE`.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Attach tag names to product rows, preserving row order.
pub(crate) async fn with_tags(
    conn: &mut PgConnection,
    rows: Vec<ProductRow>,
) -> Result<Vec<Product>, RepositoryError> {
    let ids: Vec<ProductId> = rows.iter().map(|r| r.id).collect();
    let mut tags: HashMap<ProductId, Vec<String>> = HashMap::new();
    for tag in TagRepository::new(conn).names_for_products(&ids).await? {
        tags.entry(tag.product_id).or_default().push(tag.name);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let names = tags.remove(&row.id).unwrap_or_default();
            row.into_product(names)
        })
        .collect())
}

/// Repository for product database operations.
pub struct ProductRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ProductRepository<'c> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List every product of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_store(&mut self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        self.search(store_id, None, None).await
    }

    /// List a store's products, optionally filtered by exact tag name and by
    /// a case-insensitive title substring.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn search(
        &mut self,
        store_id: StoreId,
        tag: Option<&str>,
        title_contains: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = title_contains.map(|q| format!("%{}%", escape_like(q)));

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM storekeep.product p
            WHERE p.store_id = $1
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1
                    FROM storekeep.product_tag pt
                    JOIN storekeep.tag t ON t.id = pt.tag_id
                    WHERE pt.product_id = p.id AND t.name = $2))
              AND ($3::text IS NULL OR p.title ILIKE $3)
            ORDER BY p.id
            "
        ))
        .bind(store_id)
        .bind(tag)
        .bind(pattern)
        .fetch_all(&mut *self.conn)
        .await?;

        with_tags(&mut *self.conn, rows).await
    }

    /// Get a product by ID within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_scoped(
        &mut self,
        id: ProductId,
        store_id: StoreId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storekeep.product p WHERE p.id = $1 AND p.store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(with_tags(&mut *self.conn, vec![row]).await?.pop())
    }

    /// Lock products of a store by ID (`FOR SHARE`) for the rest of the
    /// transaction. Unknown or foreign IDs are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn lock_by_ids(
        &mut self,
        store_id: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM storekeep.product p
            WHERE p.store_id = $1 AND p.id = ANY($2)
            ORDER BY p.id
            FOR SHARE
            "
        ))
        .bind(store_id)
        .bind(ids)
        .fetch_all(&mut *self.conn)
        .await?;

        with_tags(&mut *self.conn, rows).await
    }

    /// Lock products of a store by exact title (`FOR SHARE`). A title shared by
    /// several products yields every one of them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn lock_by_titles(
        &mut self,
        store_id: StoreId,
        titles: &[String],
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM storekeep.product p
            WHERE p.store_id = $1 AND p.title = ANY($2)
            ORDER BY p.id
            FOR SHARE
            "
        ))
        .bind(store_id)
        .bind(titles)
        .fetch_all(&mut *self.conn)
        .await?;

        with_tags(&mut *self.conn, rows).await
    }

    /// Insert a product. Tags are attached separately.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &mut self,
        store_id: StoreId,
        product: &ValidProduct,
    ) -> Result<ProductId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO storekeep.product (store_id, title, price, description, image_url, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(store_id)
        .bind(&product.title)
        .bind(product.price)
        .bind(product.description.as_deref())
        .bind(product.image_url.as_deref())
        .bind(product.in_stock)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    /// Replace a product's scalar fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the store.
    pub async fn update(
        &mut self,
        id: ProductId,
        store_id: StoreId,
        product: &ValidProduct,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storekeep.product
            SET title = $3, price = $4, description = $5, image_url = $6, in_stock = $7
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(id)
        .bind(store_id)
        .bind(&product.title)
        .bind(product.price)
        .bind(product.description.as_deref())
        .bind(product.image_url.as_deref())
        .bind(product.in_stock)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product. Tag and order links go with it; order totals stay.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the store.
    pub async fn delete(&mut self, id: ProductId, store_id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM storekeep.product WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("tee"), "tee");
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
    }
}
