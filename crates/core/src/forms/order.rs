//! Order creation and status update forms.

use serde::Deserialize;

use crate::catalog::{ProductRefs, RefsError};
use crate::types::{Email, OrderStatus, ProductId};
use crate::validation::{FieldErrors, required_text};

/// Maximum buyer name length.
pub const BUYER_NAME_MAX: usize = 100;

/// Body of an order creation request.
///
/// Products are referenced either by `product_ids` or by `product_names`
/// (exact titles), never both in the same request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    pub buyer_name: Option<String>,
    pub buyer_email: Option<String>,
    pub product_ids: Option<Vec<ProductId>>,
    pub product_names: Option<Vec<String>>,
}

/// A validated order request, ready for product resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrder {
    pub buyer_name: String,
    pub buyer_email: Email,
    pub products: ProductRefs,
}

impl OrderForm {
    /// Validate buyer details and the product reference list.
    ///
    /// # Errors
    ///
    /// Returns every failing field in a [`FieldErrors`] map.
    pub fn validate(self) -> Result<ValidOrder, FieldErrors> {
        let mut errors = FieldErrors::new();

        let buyer_name = required_text(
            &mut errors,
            "buyer_name",
            self.buyer_name.as_deref(),
            BUYER_NAME_MAX,
        );

        let buyer_email = match self.buyer_email.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("buyer_email", "This field is required.");
                None
            }
            Some(raw) => Email::parse(raw)
                .map_err(|_| errors.add("buyer_email", "Invalid email address."))
                .ok(),
        };

        let refs = match (self.product_ids, self.product_names) {
            (Some(_), Some(_)) => Err((
                "product_ids",
                "Provide either product_ids or product_names, not both.",
            )),
            (Some(ids), None) => ProductRefs::from_ids(ids).map_err(|e| refs_error("product_ids", &e)),
            (None, Some(names)) => {
                ProductRefs::from_titles(names).map_err(|e| refs_error("product_names", &e))
            }
            (None, None) => Err(("product_ids", "This field is required.")),
        };
        let products = refs.map_err(|(field, msg)| errors.add(field, msg)).ok();

        match (buyer_name, buyer_email, products) {
            (Some(buyer_name), Some(buyer_email), Some(products)) if errors.is_empty() => {
                Ok(ValidOrder {
                    buyer_name,
                    buyer_email,
                    products,
                })
            }
            _ => Err(errors),
        }
    }
}

fn refs_error(field: &'static str, err: &RefsError) -> (&'static str, &'static str) {
    match err {
        RefsError::Empty => (field, "At least one product is required."),
        RefsError::BlankTitle => (field, "Product names cannot be blank."),
    }
}

/// Body of an order status update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderStatusForm {
    pub status: Option<String>,
}

impl OrderStatusForm {
    /// Validate the requested status against the lifecycle enum.
    ///
    /// # Errors
    ///
    /// Returns a `status` field error when missing or unknown.
    pub fn validate(self) -> Result<OrderStatus, FieldErrors> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Err(FieldErrors::single("status", "This field is required.")),
            Some(raw) => raw
                .parse::<OrderStatus>()
                .map_err(|msg| FieldErrors::single("status", msg)),
        }
    }
}
