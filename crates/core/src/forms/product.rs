//! Product create/update form.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{Price, PriceError, TagName, TagNameError, parse_tag_list};
use crate::validation::{FieldErrors, optional_text, optional_url, required_text};

/// Body of a product create or update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: Option<bool>,
    /// Comma-separated tag names. `None` leaves tags untouched on update;
    /// `Some("")` clears them.
    pub tags: Option<String>,
}

/// A validated product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    pub title: String,
    pub price: Price,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub tags: Option<Vec<TagName>>,
}

impl ProductForm {
    pub const TITLE_MAX: usize = 255;
    pub const DESCRIPTION_MAX: usize = 500;
    pub const IMAGE_URL_MAX: usize = 255;
    pub const TAGS_MAX: usize = 255;

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns every failing field in a [`FieldErrors`] map.
    pub fn validate(self) -> Result<ValidProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required_text(&mut errors, "title", self.title.as_deref(), Self::TITLE_MAX);

        let price = match self.price {
            None => {
                errors.add("price", "This field is required.");
                None
            }
            Some(amount) => match Price::new(amount) {
                Ok(price) => Some(price),
                Err(PriceError::Negative) => {
                    errors.add("price", "Price cannot be negative.");
                    None
                }
                Err(e) => {
                    errors.add("price", capitalize(&e.to_string()));
                    None
                }
            },
        };

        let description = optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            Self::DESCRIPTION_MAX,
        );
        let image_url = optional_url(
            &mut errors,
            "image_url",
            self.image_url.as_deref(),
            Self::IMAGE_URL_MAX,
        );

        let tags = match self.tags.as_deref() {
            None => None,
            Some(csv) if csv.chars().count() > Self::TAGS_MAX => {
                errors.add(
                    "tags",
                    format!("Field cannot be longer than {} characters.", Self::TAGS_MAX),
                );
                None
            }
            Some(csv) => match parse_tag_list(csv) {
                Ok(tags) => Some(tags),
                Err(TagNameError::TooLong { name, max }) => {
                    errors.add("tags", format!("Tag '{name}' cannot be longer than {max} characters."));
                    None
                }
                Err(TagNameError::Empty) => Some(Vec::new()),
            },
        };

        match (title, price) {
            (Some(title), Some(price)) if errors.is_empty() => Ok(ValidProduct {
                title,
                price,
                description,
                image_url,
                in_stock: self.in_stock.unwrap_or(true),
                tags,
            }),
            _ => Err(errors),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).chain(['.']).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            title: Some("Summer Tee".to_string()),
            price: Some(Decimal::new(1_500, 2)),
            description: Some("Lightweight t-shirt perfect for summer days.".to_string()),
            image_url: Some("https://placehold.co/300x300".to_string()),
            in_stock: None,
            tags: Some("summer, shirt".to_string()),
        }
    }

    fn tag_names(product: &ValidProduct) -> Vec<&str> {
        product
            .tags
            .as_ref()
            .unwrap()
            .iter()
            .map(TagName::as_str)
            .collect()
    }

    #[test]
    fn test_valid_product() {
        let product = form().validate().unwrap();
        assert_eq!(product.title, "Summer Tee");
        assert_eq!(product.price.to_string(), "15.00");
        assert!(product.in_stock);
        assert_eq!(tag_names(&product), ["summer", "shirt"]);
    }

    #[test]
    fn test_zero_price_accepted() {
        let product = ProductForm {
            price: Some(Decimal::ZERO),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(product.price, Price::ZERO);
    }

    #[test]
    fn test_negative_price_rejected() {
        let errors = ProductForm {
            price: Some(Decimal::new(-1, 2)),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.get("price").unwrap(),
            ["Price cannot be negative.".to_string()]
        );
    }

    #[test]
    fn test_sub_cent_price_rejected() {
        let errors = ProductForm {
            price: Some(Decimal::new(10_005, 3)),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.get("price").unwrap(),
            ["Price can have at most 2 decimal places.".to_string()]
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = ProductForm::default().validate().unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("price").is_some());
        assert!(errors.get("tags").is_none());
    }

    #[test]
    fn test_tags_absent_vs_empty() {
        let absent = ProductForm {
            tags: None,
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(absent.tags, None);

        let cleared = ProductForm {
            tags: Some(" , ".to_string()),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(cleared.tags, Some(Vec::new()));
    }

    #[test]
    fn test_bad_image_url() {
        let errors = ProductForm {
            image_url: Some("placehold".to_string()),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.get("image_url").is_some());
    }

    #[test]
    fn test_long_tag_rejected() {
        let errors = ProductForm {
            tags: Some(format!("ok,{}", "t".repeat(51))),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert!(errors.get("tags").is_some());
    }

    #[test]
    fn test_price_from_json_number_or_string() {
        let from_number: ProductForm =
            serde_json::from_value(serde_json::json!({"title": "Mug", "price": 10})).unwrap();
        assert_eq!(from_number.validate().unwrap().price.to_string(), "10.00");

        let from_string: ProductForm =
            serde_json::from_value(serde_json::json!({"title": "Mug", "price": "10.00"})).unwrap();
        assert_eq!(from_string.validate().unwrap().price.to_string(), "10.00");
    }
}
