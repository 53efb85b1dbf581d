//! School-home communication log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{require, Record, RecordMeta, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    School,
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolMood {
    Happy,
    Neutral,
    Upset,
    Anxious,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolCommunicationDraft {
    pub date: NaiveDate,
    pub from: MessageSource,
    #[serde(default)]
    pub mood: Option<SchoolMood>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub meals: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    pub notes: String,
}

impl Validate for SchoolCommunicationDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("notes", &self.notes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolCommunication {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub from: MessageSource,
    pub mood: Option<SchoolMood>,
    pub triggers: Vec<String>,
    pub meals: Vec<String>,
    pub activities: Vec<String>,
    pub notes: String,
}

impl Record for SchoolCommunication {
    type Draft = SchoolCommunicationDraft;
    const COLLECTION: &'static str = "school_communications";

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

    fn from_draft(meta: RecordMeta, draft: SchoolCommunicationDraft) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            date: draft.date,
            from: draft.from,
            mood: draft.mood,
            triggers: draft.triggers,
            meals: draft.meals,
            activities: draft.activities,
            notes: draft.notes.trim().to_string(),
        }
    }

    fn replace(&mut self, draft: SchoolCommunicationDraft) {
        self.date = draft.date;
        self.from = draft.from;
        self.mood = draft.mood;
        self.triggers = draft.triggers;
        self.meals = draft.meals;
        self.activities = draft.activities;
        self.notes = draft.notes.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_required() {
        let mut draft: SchoolCommunicationDraft = serde_json::from_str(
            r#"{"date":"2026-09-01","from":"school","mood":"upset","notes":" "}"#,
        )
        .unwrap();
        assert_eq!(draft.mood, Some(SchoolMood::Upset));
        assert!(draft.validate().is_err());

        draft.notes = "Struggled during the fire drill".to_string();
        assert!(draft.validate().is_ok());
    }
}
