//! Storekeep server library.
//!
//! The JSON HTTP API for multi-tenant stores: seller catalog and order
//! management, public storefronts with guest checkout, and product reviews.
//! Exposed as a library so the router can be exercised from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
