//! Pet model matching the shelter API's pet records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{string_or_number, timestamp_millis};

/// Public profile flags for a pet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSettings {
    pub is_spotlight_featured: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A pet in the shelter's care.
///
/// Fields the console does not read are kept in `extra` so a record saved
/// back with PUT carries everything the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_settings: Option<ProfileSettings>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub medical: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub physical: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub photos: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pet {
    pub fn created_at_millis(&self) -> Option<i64> {
        self.created_at.as_deref().and_then(timestamp_millis)
    }

    pub fn is_spotlight_featured(&self) -> bool {
        self.profile_settings
            .as_ref()
            .is_some_and(|s| s.is_spotlight_featured)
    }

    pub fn set_spotlight_featured(&mut self, featured: bool) {
        self.profile_settings
            .get_or_insert_with(ProfileSettings::default)
            .is_spotlight_featured = featured;
    }
}

/// Species offered on the public adoption form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Cat,
    Dog,
}

/// Pet picked on the public site before starting an adoption form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetBookmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    pub species: Species,
}

/// Response of `GET /pets/adopted-count`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdoptedCount {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pet_tolerates_sparse_records() {
        let pet: Pet = serde_json::from_value(json!({ "id": 12, "name": "Colby" })).unwrap();
        assert_eq!(pet.id, "12");
        assert!(!pet.is_spotlight_featured());
        assert!(pet.photos.is_null());
        assert_eq!(pet.created_at_millis(), None);
    }

    #[test]
    fn test_profile_settings_keep_unknown_flags() {
        let pet: Pet = serde_json::from_value(json!({
            "id": "p1",
            "name": "Allison",
            "profileSettings": { "isSpotlightFeatured": true, "showMedical": false }
        }))
        .unwrap();
        assert!(pet.is_spotlight_featured());
        let back = serde_json::to_value(&pet).unwrap();
        assert_eq!(back["profileSettings"]["showMedical"], json!(false));
    }

    #[test]
    fn test_unread_fields_survive_save_round_trip() {
        let sent = json!({
            "id": "p1",
            "name": "Colby",
            "species": "cat",
            "sex": "male",
            "behavior": { "goodWithCats": true },
            "descriptions": { "primary": "Lap cat" },
            "adoption": { "fee": 75 },
            "litterName": "Autumn",
            "slug": "colby",
            "updatedAt": "2024-05-01T10:00:00Z"
        });
        let pet: Pet = serde_json::from_value(sent.clone()).unwrap();
        let body = serde_json::to_value(&pet).unwrap();
        assert_eq!(body, sent);
    }

    #[test]
    fn test_set_spotlight_featured_creates_settings() {
        let mut pet: Pet = serde_json::from_value(json!({ "id": 1, "name": "Allison" })).unwrap();
        pet.set_spotlight_featured(true);
        assert!(pet.is_spotlight_featured());
        let body = serde_json::to_value(&pet).unwrap();
        assert_eq!(body["profileSettings"], json!({ "isSpotlightFeatured": true }));
    }
}
