//! Order lifecycle status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order fulfilment status.
///
/// Orders are always created as [`OrderStatus::Pending`]; only the owning
/// seller can move them to [`OrderStatus::Fulfilled`] (or back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storekeep.order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Fulfilled,
}

impl OrderStatus {
    /// All accepted values, in display order.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Fulfilled];

    /// The wire/storage spelling of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "fulfilled" => Ok(Self::Fulfilled),
            _ => Err("Status must be 'pending' or 'fulfilled'.".to_string()),
        }
    }
}
