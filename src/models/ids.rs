//! Strongly-typed ID wrappers
//!
//! Newtype wrappers keep wizard session ids and shipment ids from being
//! mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }
    };
}

define_id!(SessionId, "ses-");
define_id!(ShipmentId, "shp-");

impl ShipmentId {
    /// Tracking number shown to the client, e.g. `SHP-1A2B3C4D`
    pub fn tracking_number(&self) -> String {
        self.to_string().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = SessionId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("ses-"));
        assert_eq!(display.len(), 12); // "ses-" + 8 chars
    }

    #[test]
    fn test_tracking_number() {
        let id = ShipmentId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.tracking_number(), "SHP-550E8400");
    }

    #[test]
    fn test_id_serialization() {
        let id = ShipmentId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ShipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
