//! Account models.
//!
//! [`User`] is the safe projection returned by the API: secret material
//! (password hash, refresh-token reference) never leaves the repository
//! layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use juniper_core::{Address, Email, Role, UserId};

/// Profile picture reference (externally hosted image).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePic {
    pub public_id: String,
    pub url: String,
}

/// Safe projection of an account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub profile_pic: Option<ProfilePic>,
    pub addresses: Vec<Address>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated data for inserting a new account.
///
/// The password is already hashed by the time this struct exists.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub addresses: Vec<Address>,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub profile_pic: Option<ProfilePic>,
    pub role: Role,
}

/// Partial profile update; `None` fields are left untouched.
///
/// Deliberately has no password field: secret changes go through the
/// dedicated password operations so re-hashing is always explicit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub profile_pic: Option<ProfilePic>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub addresses: Option<Vec<Address>>,
}

impl ProfileChanges {
    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.profile_pic.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.addresses.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());

        let changes = ProfileChanges {
            city: Some("Lisbon".to_owned()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_user_serializes_without_secrets() {
        let user = User {
            id: UserId::new(1),
            name: "Test".to_owned(),
            email: Email::parse("t@example.com").unwrap(),
            city: "Lisbon".to_owned(),
            country: "Portugal".to_owned(),
            phone: "1234567890".to_owned(),
            profile_pic: None,
            addresses: Vec::new(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("refresh"));
    }
}
