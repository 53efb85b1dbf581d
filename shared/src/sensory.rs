//! Sensory triggers and the shareable sensory profile built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{require, Record, RecordMeta, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    Sound,
    Light,
    Touch,
    Smell,
    Taste,
    Visual,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensoryTriggerDraft {
    pub trigger_type: TriggerType,
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub avoidance_strategies: Vec<String>,
}

impl Validate for SensoryTriggerDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("description", &self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensoryTrigger {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub trigger_type: TriggerType,
    pub description: String,
    pub severity: Severity,
    pub avoidance_strategies: Vec<String>,
}

impl Record for SensoryTrigger {
    type Draft = SensoryTriggerDraft;
    const COLLECTION: &'static str = "sensory_triggers";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(meta: RecordMeta, draft: SensoryTriggerDraft) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            trigger_type: draft.trigger_type,
            description: draft.description.trim().to_string(),
            severity: draft.severity,
            avoidance_strategies: draft.avoidance_strategies,
        }
    }

    fn replace(&mut self, draft: SensoryTriggerDraft) {
        self.trigger_type = draft.trigger_type;
        self.description = draft.description.trim().to_string();
        self.severity = draft.severity;
        self.avoidance_strategies = draft.avoidance_strategies;
    }
}

/// Summary meant to be shared with school, therapists and family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensoryProfile {
    /// Most severe first; stable within a severity level
    pub triggers: Vec<SensoryTrigger>,
    pub high_severity_count: usize,
    pub safe_environments: Vec<String>,
    pub calming_strategies: Vec<String>,
}

impl SensoryProfile {
    pub fn from_triggers(
        triggers: &[SensoryTrigger],
        safe_environments: Vec<String>,
        calming_strategies: Vec<String>,
    ) -> Self {
        let mut ordered = triggers.to_vec();
        ordered.sort_by(|a, b| b.severity.cmp(&a.severity));
        let high_severity_count = ordered
            .iter()
            .filter(|t| t.severity == Severity::High)
            .count();

        Self {
            triggers: ordered,
            high_severity_count,
            safe_environments,
            calming_strategies,
        }
    }

    pub fn by_type(&self, trigger_type: TriggerType) -> impl Iterator<Item = &SensoryTrigger> {
        self.triggers
            .iter()
            .filter(move |t| t.trigger_type == trigger_type)
    }
}
