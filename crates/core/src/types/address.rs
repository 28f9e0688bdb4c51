//! Postal address types.

use serde::{Deserialize, Serialize};

/// Kind of address a user registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    Home,
    Office,
    Work,
    Other,
}

/// A shipping/billing address attached to a user account.
///
/// All fields are required at registration; validation happens in the API
/// layer before an account is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub landmark: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub address_type: AddressType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_type_serde() {
        assert_eq!(
            serde_json::to_string(&AddressType::Home).unwrap(),
            "\"home\""
        );
        let ty: AddressType = serde_json::from_str("\"office\"").unwrap();
        assert_eq!(ty, AddressType::Office);
        assert!(serde_json::from_str::<AddressType>("\"castle\"").is_err());
    }

    #[test]
    fn test_address_roundtrip() {
        let address = Address {
            street: "12 Rose Lane".to_owned(),
            landmark: "Near the old mill".to_owned(),
            city: "Portland".to_owned(),
            country: "USA".to_owned(),
            postal_code: "97201".to_owned(),
            address_type: AddressType::Home,
        };
        let json = serde_json::to_string(&address).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
