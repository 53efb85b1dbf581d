//! Request and response bodies of the REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::crisis::{CalmingTechnique, Effectiveness};
use crate::emergency::EmergencyContacts;
use crate::locale::Locale;
use crate::medical_report::ReportOrder;
use crate::sensory::Severity;

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `validation` or `not_found`
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityListResponse<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatMessageRequest {
    pub content: String,
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendChatMessageResponse {
    pub message: ChatMessage,
    pub reply: ChatMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPromptsQuery {
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPromptsResponse {
    pub locale: Locale,
    pub greeting: String,
    pub prompts: Vec<String>,
}

/// `q` and `category` of a filtered list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MedicalReportQuery {
    pub order: Option<ReportOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EmergencyContactsQuery {
    pub country: Option<String>,
}

/// `tel:` links matching [`EmergencyContacts`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialLinks {
    pub medical_emergency: String,
    pub psychological_support: String,
    pub police: String,
    pub ambulance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyContactsResponse {
    pub contacts: EmergencyContacts,
    pub dial: DialLinks,
}

/// Static content of the crisis screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisResourcesResponse {
    pub techniques: &'static [CalmingTechnique],
    pub strategies: &'static [&'static str],
    pub trigger_checklist: &'static [&'static str],
}

/// Live state of an open crisis-mode session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisModeStatus {
    pub elapsed_secs: u64,
    /// `mm:ss`
    pub display: String,
    pub checked_triggers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleTriggerRequest {
    pub trigger: String,
}

/// Closes crisis mode; `date` defaults to today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FinishCrisisRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub strategies_used: Vec<String>,
    #[serde(default)]
    pub effectiveness: Effectiveness,
    #[serde(default)]
    pub intensity: Option<Severity>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Comma-separated extras for the sensory profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SensoryProfileQuery {
    pub safe: Option<String>,
    pub calming: Option<String>,
}
