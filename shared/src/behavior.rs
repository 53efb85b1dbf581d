//! Behavior log entries and the static behavior reference library.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{matches_any, CategoryFilter};
use crate::record::{non_blank, require, Record, RecordMeta, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorDraft {
    pub date: NaiveDate,
    pub behavior: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub medical_report: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub consultation_date: Option<NaiveDate>,
}

impl Validate for BehaviorDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("behavior", &self.behavior)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEntry {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub behavior: String,
    pub notes: String,
    pub medical_report: Option<String>,
    pub doctor_name: Option<String>,
    pub consultation_date: Option<NaiveDate>,
}

impl BehaviorEntry {
    /// Case-insensitive match on behavior, notes and doctor name.
    pub fn matches_search(&self, query: &str) -> bool {
        matches_any(
            query,
            [
                Some(self.behavior.as_str()),
                Some(self.notes.as_str()),
                self.doctor_name.as_deref(),
            ]
            .into_iter()
            .flatten(),
        )
    }

    pub fn has_medical_details(&self) -> bool {
        self.medical_report.is_some() || self.doctor_name.is_some() || self.consultation_date.is_some()
    }
}

pub fn filter_behavior_entries<'a>(entries: &'a [BehaviorEntry], query: &str) -> Vec<&'a BehaviorEntry> {
    entries.iter().filter(|e| e.matches_search(query)).collect()
}

impl Record for BehaviorEntry {
    type Draft = BehaviorDraft;
    const COLLECTION: &'static str = "behavior_entries";

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

    fn from_draft(meta: RecordMeta, draft: BehaviorDraft) -> Self {
        let mut entry = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            date: draft.date,
            behavior: String::new(),
            notes: String::new(),
            medical_report: None,
            doctor_name: None,
            consultation_date: None,
        };
        entry.replace(draft);
        entry
    }

    fn replace(&mut self, draft: BehaviorDraft) {
        self.date = draft.date;
        self.behavior = draft.behavior.trim().to_string();
        self.notes = draft.notes.trim().to_string();
        self.medical_report = non_blank(draft.medical_report);
        self.doctor_name = non_blank(draft.doctor_name);
        self.consultation_date = draft.consultation_date;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorCategory {
    Stimming,
    Transitions,
    Sensory,
    Communication,
}

/// Reference card describing a common behavior and how to respond to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorGuide {
    pub id: &'static str,
    pub phrase: &'static str,
    pub category: BehaviorCategory,
    pub causes: &'static [&'static str],
    pub preventions: &'static [&'static str],
    pub solutions: &'static [&'static str],
    pub practical_tips: &'static [&'static str],
    pub during_crisis: &'static [&'static str],
}

impl BehaviorGuide {
    /// Case-insensitive match on the phrase or any listed cause.
    pub fn matches_search(&self, query: &str) -> bool {
        matches_any(query, std::iter::once(self.phrase).chain(self.causes.iter().copied()))
    }
}

pub const BEHAVIOR_LIBRARY: &[BehaviorGuide] = &[
    BehaviorGuide {
        id: "hand-flapping",
        phrase: "Repetitive hand movements",
        category: BehaviorCategory::Stimming,
        causes: &[
            "Self-regulation",
            "Excitement or anxiety",
            "Processing sensory input",
        ],
        preventions: &[
            "Provide alternative sensory input",
            "Create a calm environment",
            "Establish predictable routines",
        ],
        solutions: &[
            "Offer fidget toys",
            "Teach replacement behaviors",
            "Use visual schedules",
        ],
        practical_tips: &[
            "Keep sensory toys accessible",
            "Create a sensory corner at home",
            "Try weighted blankets",
        ],
        during_crisis: &[
            "Stay calm",
            "Remove overwhelming stimuli",
            "Offer deep pressure if accepted",
        ],
    },
    BehaviorGuide {
        id: "transitions",
        phrase: "Difficulty with transitions",
        category: BehaviorCategory::Transitions,
        causes: &[
            "Need for predictability",
            "Difficulty processing change",
            "Anxiety about the unknown",
        ],
        preventions: &[
            "Use visual timers",
            "Give advance warnings",
            "Create transition routines",
        ],
        solutions: &[
            "Use visual schedules",
            "Give five-minute warnings",
            "Offer transition objects",
        ],
        practical_tips: &[
            "Use a timer app",
            "Create a transition song",
            "Prepare the child the night before",
        ],
        during_crisis: &[
            "Acknowledge feelings",
            "Offer choices when possible",
            "Use calming breathing",
        ],
    },
    BehaviorGuide {
        id: "covering-ears",
        phrase: "Covering ears in noisy places",
        category: BehaviorCategory::Sensory,
        causes: &[
            "Sound sensitivity",
            "Sensory overload",
            "Unexpected loud noises",
        ],
        preventions: &[
            "Carry noise-cancelling headphones",
            "Visit places at quieter times",
            "Warn before loud activities",
        ],
        solutions: &[
            "Move to a quieter space",
            "Offer headphones",
            "Reduce the number of people around",
        ],
        practical_tips: &[
            "Keep headphones in the bag",
            "Map quiet spots in frequent places",
            "Practise short exposures at home",
        ],
        during_crisis: &[
            "Lower your voice",
            "Lead to a quiet area",
            "Avoid touching without warning",
        ],
    },
    BehaviorGuide {
        id: "echolalia",
        phrase: "Repeating words or phrases",
        category: BehaviorCategory::Communication,
        causes: &[
            "Processing language",
            "Self-soothing",
            "Attempt to communicate",
        ],
        preventions: &[
            "Model short, clear sentences",
            "Give time to answer",
            "Use visual supports",
        ],
        solutions: &[
            "Respond to the intent behind the words",
            "Expand on the repeated phrase",
            "Offer choices with pictures",
        ],
        practical_tips: &[
            "Note which phrases appear in which situations",
            "Use picture cards",
            "Celebrate new spontaneous words",
        ],
        during_crisis: &[
            "Keep language simple",
            "Do not demand eye contact",
            "Give space and time",
        ],
    },
];

/// Library search: text match on phrase/causes AND category match.
pub fn filter_behavior_library(query: &str, category: &CategoryFilter<BehaviorCategory>) -> Vec<&'static BehaviorGuide> {
    BEHAVIOR_LIBRARY
        .iter()
        .filter(|guide| guide.matches_search(query) && category.accepts(&guide.category))
        .collect()
}
