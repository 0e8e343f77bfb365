//! Storekeep Core - shared domain types.
//!
//! This crate holds everything the server and CLI agree on without touching
//! I/O:
//! - [`types`] - newtypes for ids, prices, emails, ratings, statuses and tags
//! - [`forms`] - request bodies and their field-level validation
//! - [`catalog`] - product references and resolution checks for orders
//! - [`validation`] - the field error map returned by every form
//!
//! Enable the `postgres` feature to get `sqlx` encode/decode impls for the
//! newtypes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod forms;
pub mod types;
pub mod validation;

pub use catalog::{CatalogEntry, ProductRef, ProductRefs, RefsError, Unresolved};
pub use types::*;
pub use validation::FieldErrors;
