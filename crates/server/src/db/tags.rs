//! Tag repository for database operations.

use sqlx::PgConnection;

use storekeep_core::{ProductId, TagId};

use super::RepositoryError;
use crate::models::Tag;

#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    id: TagId,
    name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// A tag name attached to a product, used to hydrate product lists.
#[derive(Debug, sqlx::FromRow)]
pub struct ProductTagName {
    pub product_id: ProductId,
    pub name: String,
}

/// Repository for tag database operations.
pub struct TagRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TagRepository<'c> {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Find a tag by exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&mut self, name: &str) -> Result<Option<Tag>, RepositoryError> {
        let row = sqlx::query_as::<_, TagRow>("SELECT id, name FROM storekeep.tag WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new tag.
    ///
    /// A unique violation aborts the surrounding transaction, so callers that
    /// want to recover must run this inside a savepoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    pub async fn insert(&mut self, name: &str) -> Result<Tag, RepositoryError> {
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO storekeep.tag (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::unique_or_database(e, "tag already exists"))?;

        Ok(row.into())
    }

    /// Tag names for a set of products, alphabetical within each product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn names_for_products(
        &mut self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductTagName>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductTagName>(
            r"
            SELECT pt.product_id, t.name
            FROM storekeep.product_tag pt
            JOIN storekeep.tag t ON t.id = pt.tag_id
            WHERE pt.product_id = ANY($1)
            ORDER BY pt.product_id, t.name
            ",
        )
        .bind(product_ids)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Replace a product's tag set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn replace_for_product(
        &mut self,
        product_id: ProductId,
        tag_ids: &[TagId],
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM storekeep.product_tag WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *self.conn)
            .await?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r"
            INSERT INTO storekeep.product_tag (product_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::int4[]) AS tag_id
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(product_id)
        .bind(tag_ids)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }
}
