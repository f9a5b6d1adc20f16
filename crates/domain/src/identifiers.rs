//! Strongly-typed identifier types for the rankings domain.
//!
//! Games, players, categories and subcategories are all keyed by short
//! strings in storage. Wrapping each in its own newtype keeps a category id
//! from being passed where a subcategory id is expected.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from any string-like value
            #[inline]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the underlying string
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert to the underlying string
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }
    };
}

define_id!(GameId, "Identifier of a supported game title (e.g. `2kki`)");

define_id!(PlayerId, "Opaque player identifier shared with the accounts store");

define_id!(
    CategoryId,
    "Storage identifier of a ranking category (`freeEventLocationCount_2kki` for per-game categories)"
);

define_id!(
    SubCategoryId,
    "Identifier of a ranking subcategory: `all`, a game, a period ordinal, a map id or a minigame id"
);

impl SubCategoryId {
    /// The unfiltered subcategory.
    pub const ALL: &'static str = "all";

    /// The `all` subcategory
    pub fn all() -> Self {
        Self::new(Self::ALL)
    }

    /// Whether this is the unfiltered `all` subcategory
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    /// Interpret the subcategory as an event period ordinal
    pub fn period_ordinal(&self) -> Option<i32> {
        self.0.parse().ok()
    }
}
