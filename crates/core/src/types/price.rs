//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more fractional digits than cents.
    #[error("price can have at most {max} decimal places")]
    TooPrecise {
        /// Maximum allowed fractional digits.
        max: u32,
    },
    /// The amount does not fit the `NUMERIC(10,2)` column.
    #[error("price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: Decimal,
    },
}

/// A non-negative monetary amount with at most two fractional digits.
///
/// Product prices and order totals both use this type, so a total is always
/// the exact decimal sum of the prices it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Fractional digits kept by the storage column.
    pub const SCALE: u32 = 2;

    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Exclusive upper bound imposed by `NUMERIC(10,2)`.
    #[must_use]
    pub fn max_exclusive() -> Decimal {
        Decimal::new(100_000_000, 0)
    }

    /// Exclusive upper bound on an order total, imposed by `NUMERIC(14,2)`.
    #[must_use]
    pub fn max_total_exclusive() -> Decimal {
        Decimal::new(1_000_000_000_000, 0)
    }

    /// Validate and wrap a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the amount is negative, has more than two
    /// fractional digits, or overflows the storage column.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooPrecise { max: Self::SCALE });
        }

        if amount >= Self::max_exclusive() {
            return Err(PriceError::TooLarge {
                max: Self::max_exclusive(),
            });
        }

        let mut amount = amount;
        amount.rescale(Self::SCALE);
        Ok(Self(amount))
    }

    /// Create a price from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if `cents` is negative or too large.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, Self::SCALE))
    }

    /// The wrapped decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Sums of stored prices may exceed the per-product bound, so only the
        // sign is re-checked here.
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Box::new(PriceError::Negative));
        }
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_accepted() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_negative_cent_is_rejected() {
        assert_eq!(Price::new(Decimal::new(-1, 2)), Err(PriceError::Negative));
    }

    #[test]
    fn test_more_than_two_decimals_rejected() {
        assert_eq!(
            Price::new(Decimal::new(10_001, 3)),
            Err(PriceError::TooPrecise { max: 2 })
        );
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        // 10.000 normalizes to 10
        let price = Price::new(Decimal::new(10_000, 3)).unwrap();
        assert_eq!(price.to_string(), "10.00");
    }

    #[test]
    fn test_too_large_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(100_000_000, 0)),
            Err(PriceError::TooLarge { .. })
        ));
        assert!(Price::new(Decimal::new(9_999_999_999, 2)).is_ok());
    }

    #[test]
    fn test_sum_is_exact() {
        let prices = [
            Price::from_cents(1_000).unwrap(),
            Price::from_cents(1_500).unwrap(),
            Price::from_cents(1).unwrap(),
        ];
        let total: Price = prices.iter().sum();
        assert_eq!(total, Price::from_cents(2_501).unwrap());
        assert_eq!(total.to_string(), "25.01");
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = std::iter::empty::<Price>().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let price = Price::from_cents(1_000).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"10.00\"");

        let parsed: Price = serde_json::from_str("\"10.5\"").unwrap();
        assert_eq!(parsed, Price::from_cents(1_050).unwrap());

        assert!(serde_json::from_str::<Price>("\"-0.01\"").is_err());
    }
}
