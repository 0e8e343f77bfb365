//! Product review forms.

use serde::Deserialize;

use crate::types::{ProductId, Rating};
use crate::validation::{FieldErrors, optional_text};

/// Body of a review update (and the shared part of a review create).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Body of a review create request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReviewForm {
    pub product_id: Option<ProductId>,
    #[serde(flatten)]
    pub review: ReviewForm,
}

/// A validated rating and comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub rating: Rating,
    pub comment: Option<String>,
}

impl ReviewForm {
    pub const COMMENT_MAX: usize = 1000;

    /// Validate rating bounds and comment length.
    ///
    /// # Errors
    ///
    /// Returns every failing field in a [`FieldErrors`] map.
    pub fn validate(self) -> Result<ValidReview, FieldErrors> {
        let mut errors = FieldErrors::new();

        let rating = match self.rating {
            None => {
                errors.add("rating", "This field is required.");
                None
            }
            Some(value) => Rating::new(value)
                .map_err(|_| {
                    errors.add(
                        "rating",
                        format!(
                            "Number must be between {} and {}.",
                            Rating::MIN,
                            Rating::MAX
                        ),
                    );
                })
                .ok(),
        };

        let comment = optional_text(
            &mut errors,
            "comment",
            self.comment.as_deref(),
            Self::COMMENT_MAX,
        );

        match rating {
            Some(rating) if errors.is_empty() => Ok(ValidReview { rating, comment }),
            _ => Err(errors),
        }
    }
}

impl NewReviewForm {
    /// Validate the target product id along with the review body.
    ///
    /// # Errors
    ///
    /// Returns every failing field in a [`FieldErrors`] map.
    pub fn validate(self) -> Result<(ProductId, ValidReview), FieldErrors> {
        let product_id = self.product_id;
        let review = self.review.validate();
        match (product_id, review) {
            (Some(id), Ok(review)) => Ok((id, review)),
            (None, Ok(_)) => Err(FieldErrors::single("product_id", "This field is required.")),
            (Some(_), Err(errors)) => Err(errors),
            (None, Err(mut errors)) => {
                errors.add("product_id", "This field is required.");
                Err(errors)
            }
        }
    }
}
