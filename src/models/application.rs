//! Application model: adoption, volunteer and surrender submissions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{string_or_number, timestamp_millis};

/// Kind of submitted application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    Adoption,
    Volunteer,
    Surrender,
}

impl ApplicationType {
    pub const ALL: [ApplicationType; 3] = [
        ApplicationType::Adoption,
        ApplicationType::Volunteer,
        ApplicationType::Surrender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::Adoption => "adoption",
            ApplicationType::Volunteer => "volunteer",
            ApplicationType::Surrender => "surrender",
        }
    }

    fn fallback_name(&self) -> &'static str {
        match self {
            ApplicationType::Adoption => "Adoption Applicant",
            ApplicationType::Volunteer => "Volunteer Applicant",
            ApplicationType::Surrender => "Surrender Applicant",
        }
    }
}

/// Workflow status of an application.
///
/// The API has used two vocabularies over time; both are accepted and unknown
/// values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Denied,
    NeedsInfo,
    Autodeleted,
    VideoApproved,
    Submitted,
    UnderReview,
    VideoRequested,
    PaymentPending,
    ContractPending,
    Adopted,
    Rejected,
    Other(String),
}

/// Display colour for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Gray,
    Green,
    Red,
    Yellow,
    Blue,
}

/// Group an application is listed under in the admin view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusGroup {
    Pending,
    Approved,
    Deleted,
}

impl ApplicationStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => ApplicationStatus::Pending,
            "approved" => ApplicationStatus::Approved,
            "denied" => ApplicationStatus::Denied,
            "needs_info" => ApplicationStatus::NeedsInfo,
            "autodeleted" => ApplicationStatus::Autodeleted,
            "video_approved" => ApplicationStatus::VideoApproved,
            "submitted" => ApplicationStatus::Submitted,
            "under_review" => ApplicationStatus::UnderReview,
            "video_requested" => ApplicationStatus::VideoRequested,
            "payment_pending" => ApplicationStatus::PaymentPending,
            "contract_pending" => ApplicationStatus::ContractPending,
            "adopted" => ApplicationStatus::Adopted,
            "rejected" => ApplicationStatus::Rejected,
            other => ApplicationStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Denied => "denied",
            ApplicationStatus::NeedsInfo => "needs_info",
            ApplicationStatus::Autodeleted => "autodeleted",
            ApplicationStatus::VideoApproved => "video_approved",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::VideoRequested => "video_requested",
            ApplicationStatus::PaymentPending => "payment_pending",
            ApplicationStatus::ContractPending => "contract_pending",
            ApplicationStatus::Adopted => "adopted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Other(s) => s,
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            ApplicationStatus::Pending => "Pending".to_string(),
            ApplicationStatus::Approved => "Approved".to_string(),
            ApplicationStatus::Denied => "Denied".to_string(),
            ApplicationStatus::NeedsInfo => "Needs Info".to_string(),
            ApplicationStatus::Autodeleted => "Auto-Deleted".to_string(),
            ApplicationStatus::VideoApproved => "Video Approved".to_string(),
            ApplicationStatus::Submitted => "Submitted".to_string(),
            ApplicationStatus::UnderReview => "Under Review".to_string(),
            ApplicationStatus::Adopted => "Adopted".to_string(),
            ApplicationStatus::Rejected => "Rejected".to_string(),
            other => other.as_str().to_string(),
        }
    }

    pub fn color(&self) -> StatusColor {
        match self {
            ApplicationStatus::Pending
            | ApplicationStatus::Submitted
            | ApplicationStatus::UnderReview => StatusColor::Blue,
            ApplicationStatus::Approved
            | ApplicationStatus::VideoApproved
            | ApplicationStatus::Adopted => StatusColor::Green,
            ApplicationStatus::Denied | ApplicationStatus::Rejected => StatusColor::Red,
            ApplicationStatus::NeedsInfo => StatusColor::Yellow,
            _ => StatusColor::Gray,
        }
    }

    pub fn group(&self) -> Option<StatusGroup> {
        match self {
            ApplicationStatus::Pending
            | ApplicationStatus::NeedsInfo
            | ApplicationStatus::Denied
            | ApplicationStatus::Submitted
            | ApplicationStatus::UnderReview => Some(StatusGroup::Pending),
            ApplicationStatus::Approved
            | ApplicationStatus::Adopted
            | ApplicationStatus::VideoApproved => Some(StatusGroup::Approved),
            ApplicationStatus::Autodeleted => Some(StatusGroup::Deleted),
            _ => None,
        }
    }

    /// Statuses counted by the "needs attention" badge.
    pub fn awaits_review(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Pending
                | ApplicationStatus::Submitted
                | ApplicationStatus::UnderReview
        )
    }
}

impl From<String> for ApplicationStatus {
    fn from(s: String) -> Self {
        ApplicationStatus::parse(&s)
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application record as sent by `GET /v1/applications`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawApplication {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ApplicationType,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub data: Value,
    pub created_at: String,
}

/// Short summary shown on an application card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    pub pet_name: String,
    pub role: Option<String>,
    pub reason: String,
}

/// Application as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ApplicationType,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub applicant_name: String,
    pub email: String,
    pub details: ApplicationDetails,
    pub full_application: Value,
}

impl Application {
    pub fn created_at_millis(&self) -> Option<i64> {
        timestamp_millis(&self.created_at)
    }

    /// Case-insensitive match against name, email and pet name. `needle` must be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.applicant_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.details.pet_name.to_lowercase().contains(needle)
    }
}

impl From<RawApplication> for Application {
    fn from(raw: RawApplication) -> Self {
        let data = raw.data.as_object().cloned().unwrap_or_default();

        let applicant_name = match (text(&data, "firstName"), text(&data, "lastName")) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ if raw.kind == ApplicationType::Volunteer => text(&data, "nameFull")
                .unwrap_or_else(|| raw.kind.fallback_name().to_string()),
            _ => raw.kind.fallback_name().to_string(),
        };

        let email = text(&data, "email")
            .or_else(|| text(&data, "Email"))
            .unwrap_or_default();

        let pet_name = text(&data, "petName")
            .or_else(|| text(&data, "catPreferenceName"))
            .or_else(|| text(&data, "animalName"))
            .or_else(|| text(&data, "catPreferenceBreed").map(|b| format!("Breed: {}", b)))
            .unwrap_or_default();

        let role = data.get("positionPreferences").and_then(format_role);

        let reason = text(&data, "interestReason")
            .or_else(|| text(&data, "adoptionReason"))
            .or_else(|| text(&data, "animalWhySurrendered"))
            .unwrap_or_default();

        let mut full = data;
        full.insert("createdAt".to_string(), Value::String(raw.created_at.clone()));

        Application {
            id: raw.id,
            kind: raw.kind,
            status: raw.status,
            created_at: raw.created_at,
            applicant_name,
            email,
            details: ApplicationDetails {
                pet_name,
                role,
                reason,
            },
            full_application: Value::Object(full),
        }
    }
}

fn text(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn format_role(prefs: &Value) -> Option<String> {
    match prefs {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(String::new()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Tab selected in the applications view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationTab {
    #[default]
    Adoption,
    Volunteer,
    Surrender,
    History,
}

impl ApplicationTab {
    pub fn matches(&self, kind: ApplicationType) -> bool {
        match self {
            ApplicationTab::Adoption => kind == ApplicationType::Adoption,
            ApplicationTab::Volunteer => kind == ApplicationType::Volunteer,
            ApplicationTab::Surrender => kind == ApplicationType::Surrender,
            ApplicationTab::History => true,
        }
    }
}

impl From<ApplicationType> for ApplicationTab {
    fn from(kind: ApplicationType) -> Self {
        match kind {
            ApplicationType::Adoption => ApplicationTab::Adoption,
            ApplicationType::Volunteer => ApplicationTab::Volunteer,
            ApplicationType::Surrender => ApplicationTab::Surrender,
        }
    }
}

/// Status filter selected in the applications view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Denied,
}

impl StatusFilter {
    pub fn matches(&self, status: &ApplicationStatus) -> bool {
        use ApplicationStatus as S;
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => matches!(
                status,
                S::Pending
                    | S::Submitted
                    | S::UnderReview
                    | S::VideoRequested
                    | S::PaymentPending
                    | S::ContractPending
                    | S::NeedsInfo
            ),
            StatusFilter::Approved => {
                matches!(status, S::Approved | S::Adopted | S::VideoApproved)
            }
            StatusFilter::Denied => matches!(status, S::Denied | S::Rejected),
        }
    }
}

/// Request body for `PUT /v1/applications/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusRequest<'a> {
    pub status: &'a ApplicationStatus,
}
