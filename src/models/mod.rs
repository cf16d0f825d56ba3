//! Data models for the shelter console.
//!
//! Field names follow the shelter API's JSON contract so records round-trip
//! between the upstream API, the stores and the kiosk feed.

mod application;
mod campaign;
mod pet;
mod settings;
mod user;
mod volunteer;

pub use application::*;
pub use campaign::*;
pub use pet::*;
pub use settings::*;
pub use user::*;
pub use volunteer::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Parse an API timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`) and bare dates (`2024-03-01`, read as UTC midnight).
pub fn timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Server ids arrive as numbers for some resources and strings for others.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => Some(s),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_millis_formats() {
        assert_eq!(timestamp_millis("1970-01-02"), Some(86_400_000));
        assert_eq!(timestamp_millis("1970-01-01T00:00:01Z"), Some(1_000));
        assert_eq!(timestamp_millis("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(timestamp_millis("yesterday"), None);
    }
}
