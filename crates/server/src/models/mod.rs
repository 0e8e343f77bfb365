//! Domain models.
//!
//! These are validated domain objects, separate from the row types in
//! [`crate::db`]. Every model serializes to the JSON shape returned by the API.

pub mod order;
pub mod product;
pub mod review;
pub mod session;
pub mod store;
pub mod user;

pub use order::Order;
pub use product::{Product, Tag};
pub use review::Review;
pub use session::{CurrentUser, keys as session_keys};
pub use store::Store;
pub use user::User;
