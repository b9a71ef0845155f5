use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which listing collaborator produced a property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Source {
    ListingsApi,
    Mock,
}

/// Latitude/longitude pair for map display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Core property data model. Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub source: Source,
    pub price: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Square footage
    pub size: f64,
    pub year_built: Option<i32>,
    pub amenities: Vec<String>,
    pub photos: Vec<String>,
    pub description: Option<String>,
    pub location: Option<Coordinates>,
}

/// A user's favorite, holding a denormalized copy of the property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub user_id: String,
    pub property: Property,
    pub created_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn new(user_id: impl Into<String>, property: Property) -> Self {
        Self {
            user_id: user_id.into(),
            property,
            created_at: Utc::now(),
        }
    }

    /// Document key; one record per (user, property) pair
    pub fn key(&self) -> FavoriteKey {
        Self::key_for(&self.user_id, &self.property.id)
    }

    pub fn key_for(user_id: &str, property_id: &str) -> FavoriteKey {
        FavoriteKey {
            user_id: user_id.to_string(),
            property_id: property_id.to_string(),
        }
    }
}

/// Identity of a favorite document. Kept as two fields so that no pair of
/// ids can collide with another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FavoriteKey {
    pub user_id: String,
    pub property_id: String,
}

impl std::fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.property_id)
    }
}

/// Signed-in user as supplied by the auth collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Explicit session context handed to components instead of a global
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// A property paired with its presentational favorite state
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub is_favorite: bool,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn property(id: &str, amenities: &[&str]) -> Property {
        Property {
            id: id.to_string(),
            source: Source::Mock,
            price: 450_000.0,
            address: format!("{} Main St", id),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: Some("62701".to_string()),
            property_type: "Single Family".to_string(),
            bedrooms: 3,
            bathrooms: 2,
            size: 1800.0,
            year_built: Some(1998),
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            photos: vec![],
            description: None,
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_record_key_is_user_and_property() {
        let record = FavoriteRecord::new("user-1", fixtures::property("42", &[]));
        assert_eq!(record.key(), FavoriteRecord::key_for("user-1", "42"));
        assert_eq!(record.key().to_string(), "user-1/42");
    }

    #[test]
    fn test_keys_with_underscores_stay_distinct() {
        assert_ne!(
            FavoriteRecord::key_for("a_b", "c"),
            FavoriteRecord::key_for("a", "b_c")
        );
    }

    #[test]
    fn test_session_user_id() {
        assert_eq!(Session::default().user_id(), None);

        let session = Session::signed_in(User {
            id: "u1".to_string(),
            email: "u1@example.com".to_string(),
        });
        assert_eq!(session.user_id(), Some("u1"));
    }
}
