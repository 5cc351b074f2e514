//! Identifier and name types for the property graph

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }

            /// Arena slot this id occupies
            pub(crate) fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_string())
            }
        }
    };
}

numeric_id!(
    /// Node identifier. Ids start at 1 and are never reused until the store
    /// is cleared.
    NodeId,
    "n"
);

numeric_id!(
    /// Edge identifier
    EdgeId,
    "e"
);

name_type!(
    /// Node label, e.g. `Station`
    Label
);

name_type!(
    /// Relationship type. Each subway line stamps its own type on its
    /// connections (e.g. `piccadilly`).
    EdgeType
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(id.to_string(), "n42");
        assert_eq!(EdgeId::from(7).to_string(), "e7");
        assert!(NodeId::new(1) < NodeId::new(2));
    }

    #[test]
    fn test_names() {
        let label: Label = "Station".into();
        assert_eq!(label.as_str(), "Station");
        assert_eq!(EdgeType::new("piccadilly").to_string(), "piccadilly");
        assert_ne!(EdgeType::new("piccadilly"), EdgeType::new("Piccadilly"));
    }
}
