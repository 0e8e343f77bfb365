//! Business logic on top of the repositories.
//!
//! Workflow functions borrow a `&mut PgConnection` from a transaction owned by
//! the caller. They never commit; dropping the transaction rolls everything
//! back.

pub mod auth;
pub mod catalog;
pub mod media;
pub mod orders;
pub mod products;
pub mod scope;
pub mod tags;

use thiserror::Error;

use storekeep_core::{FieldErrors, Unresolved};

use crate::db::RepositoryError;

/// Errors raised by the store, catalog and order workflows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// The named resource does not exist in the caller's scope.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Product references did not all resolve within the store.
    #[error(transparent)]
    Unresolved(#[from] Unresolved),

    /// A uniqueness rule was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Repository(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Turn a repository `NotFound` into a named service `NotFound`.
pub(crate) fn not_found_as(what: &'static str) -> impl FnOnce(RepositoryError) -> ServiceError {
    move |e| match e {
        RepositoryError::NotFound => ServiceError::NotFound(what),
        other => other.into(),
    }
}
