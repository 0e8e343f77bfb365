//! Review repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use storekeep_core::forms::ValidReview;
use storekeep_core::{ProductId, Rating, ReviewId, UserId};

use super::RepositoryError;
use crate::models::Review;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    user_id: UserId,
    product_id: ProductId,
    rating: Rating,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const REVIEW_COLUMNS: &str = "id, user_id, product_id, rating, comment, created_at, updated_at";

/// Repository for review database operations.
pub struct ReviewRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ReviewRepository<'c> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List a product's reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &mut self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            r"
            SELECT {REVIEW_COLUMNS}
            FROM storekeep.review
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(product_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Whether a product exists in any store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_exists(&mut self, product_id: ProductId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storekeep.product WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(exists)
    }

    /// Create a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &mut self,
        user_id: UserId,
        product_id: ProductId,
        review: &ValidReview,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r"
            INSERT INTO storekeep.review (user_id, product_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING {REVIEW_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(review.rating)
        .bind(review.comment.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(row.into())
    }

    /// Update a review written by `author`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such review belongs to `author`.
    pub async fn update_by_author(
        &mut self,
        id: ReviewId,
        author: UserId,
        review: &ValidReview,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r"
            UPDATE storekeep.review
            SET rating = $3, comment = $4
            WHERE id = $1 AND user_id = $2
            RETURNING {REVIEW_COLUMNS}
            "
        ))
        .bind(id)
        .bind(author)
        .bind(review.rating)
        .bind(review.comment.as_deref())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a review written by `author`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such review belongs to `author`.
    pub async fn delete_by_author(
        &mut self,
        id: ReviewId,
        author: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM storekeep.review WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(author)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
