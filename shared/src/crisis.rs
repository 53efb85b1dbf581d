//! Logged crisis episodes and the static crisis-mode content.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{non_blank, Record, RecordMeta, Validate, ValidationError};
use crate::sensory::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Effectiveness {
    Worked,
    #[default]
    Partial,
    DidntWork,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisRecordDraft {
    pub date: NaiveDate,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub strategies_used: Vec<String>,
    #[serde(default)]
    pub effectiveness: Effectiveness,
    #[serde(default = "default_intensity")]
    pub intensity: Severity,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_intensity() -> Severity {
    Severity::Medium
}

impl Validate for CrisisRecordDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.triggers.iter().all(|t| t.trim().is_empty()) {
            return Err(ValidationError::MissingField {
                field: "triggers".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisRecord {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub duration: u32,
    pub triggers: Vec<String>,
    pub strategies_used: Vec<String>,
    pub effectiveness: Effectiveness,
    pub intensity: Severity,
    pub notes: Option<String>,
}

impl Record for CrisisRecord {
    type Draft = CrisisRecordDraft;
    const COLLECTION: &'static str = "crisis_records";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn recency_key(&self) -> String {
        self.date.to_string()
    }

    fn from_draft(meta: RecordMeta, draft: CrisisRecordDraft) -> Self {
        let mut record = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            date: draft.date,
            duration: 0,
            triggers: Vec::new(),
            strategies_used: Vec::new(),
            effectiveness: Effectiveness::default(),
            intensity: Severity::Medium,
            notes: None,
        };
        record.replace(draft);
        record
    }

    fn replace(&mut self, draft: CrisisRecordDraft) {
        self.date = draft.date;
        self.duration = draft.duration;
        self.triggers = draft
            .triggers
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self.strategies_used = draft.strategies_used;
        self.effectiveness = draft.effectiveness;
        self.intensity = draft.intensity;
        self.notes = non_blank(draft.notes);
    }
}

/// Guided calming technique offered while crisis mode is active
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalmingTechnique {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const CALMING_TECHNIQUES: &[CalmingTechnique] = &[
    CalmingTechnique {
        id: "breathing",
        title: "Guided breathing",
        description: "Breathe in for 4 seconds, hold for 4, breathe out for 4",
    },
    CalmingTechnique {
        id: "massage",
        title: "Light massage",
        description: "Slow circular movements on the arms",
    },
    CalmingTechnique {
        id: "sounds",
        title: "Calming sounds",
        description: "Soft music or nature sounds",
    },
];

pub const CRISIS_STRATEGIES: &[&str] = &[
    "Favourite sensory toy",
    "Quiet, dark space",
    "Weighted blanket",
    "Reduce visual stimuli",
    "Speak in a low, calm voice",
];

/// Possible triggers to check once the child is calm
pub const TRIGGER_CHECKLIST: &[&str] = &[
    "Loud noise",
    "Too many people",
    "Change of routine",
    "Hunger or thirst",
    "Tiredness",
    "Physical discomfort",
];
