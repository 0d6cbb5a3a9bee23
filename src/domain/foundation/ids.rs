//! Strongly-typed identifier value objects.
//!
//! Records are keyed by store-assigned integers, so every identifier wraps
//! an `i64` (the width of a PostgreSQL `BIGSERIAL`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw store identifier.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a catalog product.
    ProductId
);

numeric_id!(
    /// Identifier of a product grouping (drinks, mains, ...).
    ProductTypeId
);

numeric_id!(
    /// Identifier of a fulfillment station.
    StationId
);

numeric_id!(
    /// Identifier of a placed order.
    OrderId
);

numeric_id!(
    /// Identifier of a single order line (one unit of one product).
    OrderLineId
);

numeric_id!(
    /// Identifier of a staff account.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_path_segment() {
        let id: OrderId = "42".parse().unwrap();
        assert_eq!(id, OrderId::new(42));
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!("abc".parse::<ProductId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&StationId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: StationId = serde_json::from_str("3").unwrap();
        assert_eq!(back, StationId::new(3));
    }

    #[test]
    fn displays_inner_value() {
        assert_eq!(ProductId::new(9).to_string(), "9");
    }
}
