//! Typed request forms.
//!
//! Each form is the raw JSON body of one operation with every field optional,
//! so missing fields surface as field errors instead of deserialization
//! failures. `validate()` checks every rule eagerly and returns either the
//! cleaned values or a [`FieldErrors`](crate::FieldErrors) map.

pub mod order;
pub mod product;
pub mod review;
pub mod store;

pub use order::{OrderForm, OrderStatusForm, ValidOrder};
pub use product::{ProductForm, ValidProduct};
pub use review::{NewReviewForm, ReviewForm, ValidReview};
pub use store::{StoreForm, ValidStore};
