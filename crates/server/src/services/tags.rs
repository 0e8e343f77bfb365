//! Tag reconciler: comma-separated names to shared tag rows.

use sqlx::{Connection, PgConnection};

use storekeep_core::{FieldErrors, ProductId, TagName, parse_tag_list};

use super::ServiceError;
use crate::db::{RepositoryError, TagRepository};
use crate::models::Tag;

/// Parse a comma-separated list and find or create each tag.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for an over-long name, or any error
/// from [`reconcile_names`].
pub async fn reconcile(conn: &mut PgConnection, csv: &str) -> Result<Vec<Tag>, ServiceError> {
    let names =
        parse_tag_list(csv).map_err(|e| FieldErrors::single("tags", e.to_string()))?;
    reconcile_names(conn, &names).await
}

/// Find or create a tag for each name, in order.
///
/// # Errors
///
/// Returns `ServiceError::Conflict` if a name could be neither inserted nor
/// read back, or `ServiceError::Repository` on storage failure.
pub async fn reconcile_names(
    conn: &mut PgConnection,
    names: &[TagName],
) -> Result<Vec<Tag>, ServiceError> {
    let mut tags = Vec::with_capacity(names.len());
    for name in names {
        tags.push(find_or_create(&mut *conn, name.as_str()).await?);
    }
    Ok(tags)
}

/// Replace a product's tags with the reconciled `names`.
///
/// # Errors
///
/// Same as [`reconcile_names`].
pub async fn set_product_tags(
    conn: &mut PgConnection,
    product_id: ProductId,
    names: &[TagName],
) -> Result<Vec<Tag>, ServiceError> {
    let tags = reconcile_names(&mut *conn, names).await?;
    let ids: Vec<_> = tags.iter().map(|t| t.id).collect();
    TagRepository::new(conn)
        .replace_for_product(product_id, &ids)
        .await?;
    Ok(tags)
}

/// Select by name; if absent insert inside a savepoint. A concurrent insert
/// of the same name makes ours fail on the unique index, in which case the
/// savepoint is rolled back and the row is read once more.
async fn find_or_create(conn: &mut PgConnection, name: &str) -> Result<Tag, ServiceError> {
    if let Some(tag) = TagRepository::new(&mut *conn).find_by_name(name).await? {
        return Ok(tag);
    }

    let mut savepoint = conn.begin().await?;
    let inserted = TagRepository::new(&mut savepoint).insert(name).await;
    match inserted {
        Ok(tag) => {
            savepoint.commit().await?;
            Ok(tag)
        }
        Err(RepositoryError::Conflict(_)) => {
            savepoint.rollback().await?;
            tracing::warn!(tag = name, "Tag created concurrently, re-reading");
            TagRepository::new(conn)
                .find_by_name(name)
                .await?
                .ok_or_else(|| ServiceError::Conflict(format!("tag '{name}' could not be created")))
        }
        Err(e) => Err(e.into()),
    }
}
