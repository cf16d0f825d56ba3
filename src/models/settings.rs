//! Console settings persisted on the client.
//!
//! Every section defaults field-by-field, so a blob saved by an older build
//! picks up new keys with their default values when loaded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub organization: OrganizationSettings,
    pub volunteers: VolunteerSettings,
    pub pets: PetDefaults,
    pub notifications: NotificationSettings,
    pub forms: FormsSettings,
    pub overview: OverviewSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationSettings {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub timezone: String,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            name: "Happy Tails Shelter".to_string(),
            email: "contact@happytails.org".to_string(),
            phone: "555-0123".to_string(),
            timezone: "PST".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolunteerSettings {
    pub enable_gamification: bool,
    pub auto_approve_shifts: bool,
    pub min_hours_for_tier1: u32,
    pub shift_reminder_hours: String,
    pub allow_teen_volunteers: bool,
}

impl Default for VolunteerSettings {
    fn default() -> Self {
        Self {
            enable_gamification: true,
            auto_approve_shifts: false,
            min_hours_for_tier1: 20,
            shift_reminder_hours: "24".to_string(),
            allow_teen_volunteers: true,
        }
    }
}

/// Defaults applied when creating a new pet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PetDefaults {
    pub default_species: String,
    pub default_breed: String,
    pub default_intake_status: String,
    pub default_environment: String,
    pub measurement_system: String,
    pub require_microchip: bool,
    pub default_adoption_fee: f64,
    pub default_shelter_location: String,
    pub default_show_medical: bool,
    pub default_bio_template: String,
    pub default_good_with_cats: String,
    pub default_good_with_dogs: String,
    pub default_good_with_kids: String,
    pub require_photo_for_public: bool,
    pub default_auto_hold_period: u32,
}

impl Default for PetDefaults {
    fn default() -> Self {
        Self {
            default_species: "cat".to_string(),
            default_breed: "Domestic Short Hair".to_string(),
            default_intake_status: "intake".to_string(),
            default_environment: "indoor".to_string(),
            measurement_system: "imperial".to_string(),
            require_microchip: false,
            default_adoption_fee: 0.0,
            default_shelter_location: String::new(),
            default_show_medical: false,
            default_bio_template: String::new(),
            default_good_with_cats: "unknown".to_string(),
            default_good_with_dogs: "unknown".to_string(),
            default_good_with_kids: "unknown".to_string(),
            require_photo_for_public: false,
            default_auto_hold_period: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_digests: String,
    pub incident_alerts: bool,
    pub new_application_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_digests: "daily".to_string(),
            incident_alerts: true,
            new_application_alerts: true,
        }
    }
}

/// Where submissions of one application form are routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRouting {
    pub enabled: bool,
    pub emails: Vec<String>,
}

impl FormRouting {
    fn to(emails: &[&str]) -> Self {
        Self {
            enabled: true,
            emails: emails.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormsSettings {
    pub volunteer: FormRouting,
    pub surrender: FormRouting,
    pub adoption: FormRouting,
}

impl Default for FormsSettings {
    fn default() -> Self {
        Self {
            volunteer: FormRouting::to(&["director@happytails.org", "volunteers@happytails.org"]),
            surrender: FormRouting::to(&["director@happytails.org", "intake@happytails.org"]),
            adoption: FormRouting::to(&["adoptions@happytails.org"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverviewSettings {
    pub show_recent_activity: bool,
    pub show_pending_tasks: bool,
    pub show_stats_graph: bool,
}

impl Default for OverviewSettings {
    fn default() -> Self {
        Self {
            show_recent_activity: true,
            show_pending_tasks: true,
            show_stats_graph: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_blob_merges_over_defaults() {
        let settings: AppSettings = serde_json::from_value(json!({
            "organization": { "name": "Paws Place" },
            "volunteers": { "minHoursForTier1": 40 }
        }))
        .unwrap();

        assert_eq!(settings.organization.name, "Paws Place");
        assert_eq!(settings.organization.phone, "555-0123");
        assert_eq!(settings.volunteers.min_hours_for_tier1, 40);
        assert!(settings.volunteers.enable_gamification);
        assert_eq!(settings.forms.adoption.emails, vec!["adoptions@happytails.org"]);
    }
}
