//! Medications and therapies: the recurring parts of a child's care plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{
    non_blank, require, require_clock_time, Record, RecordMeta, Validate, ValidationError, Weekday,
};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDraft {
    pub name: String,
    pub dosage: String,
    /// HH:MM, one per dose
    #[serde(default)]
    pub times: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Validate for MedicationDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("dosage", &self.dosage)?;
        for time in &self.times {
            require_clock_time("times", time)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub dosage: String,
    pub times: Vec<String>,
    pub notes: Option<String>,
    pub active: bool,
}

impl Medication {
    /// First dose strictly after `now` (HH:MM), if any remain today.
    pub fn next_dose_after(&self, now: &str) -> Option<&str> {
        self.times
            .iter()
            .map(String::as_str)
            .filter(|time| *time > now)
            .min()
    }
}

impl Record for Medication {
    type Draft = MedicationDraft;
    const COLLECTION: &'static str = "medications";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(meta: RecordMeta, draft: MedicationDraft) -> Self {
        let mut medication = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            name: String::new(),
            dosage: String::new(),
            times: Vec::new(),
            notes: None,
            active: true,
        };
        medication.replace(draft);
        medication
    }

    fn replace(&mut self, draft: MedicationDraft) {
        let mut times = draft.times;
        times.sort();
        times.dedup();

        self.name = draft.name.trim().to_string();
        self.dosage = draft.dosage.trim().to_string();
        self.times = times;
        self.notes = non_blank(draft.notes);
        self.active = draft.active;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapySchedule {
    pub day: Weekday,
    /// HH:MM
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapyDraft {
    pub therapy_type: String,
    pub therapist_name: String,
    pub schedule: TherapySchedule,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Validate for TherapyDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("therapy_type", &self.therapy_type)?;
        require("therapist_name", &self.therapist_name)?;
        require_clock_time("schedule.time", &self.schedule.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Therapy {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub therapy_type: String,
    pub therapist_name: String,
    pub schedule: TherapySchedule,
    pub location: String,
    pub notes: Option<String>,
    pub active: bool,
}

impl Record for Therapy {
    type Draft = TherapyDraft;
    const COLLECTION: &'static str = "therapies";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(meta: RecordMeta, draft: TherapyDraft) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            therapy_type: draft.therapy_type.trim().to_string(),
            therapist_name: draft.therapist_name.trim().to_string(),
            schedule: draft.schedule,
            location: draft.location.trim().to_string(),
            notes: non_blank(draft.notes),
            active: draft.active,
        }
    }

    fn replace(&mut self, draft: TherapyDraft) {
        let meta = RecordMeta {
            id: std::mem::take(&mut self.id),
            user_id: std::mem::take(&mut self.user_id),
            created_at: self.created_at,
        };
        *self = Self::from_draft(meta, draft);
    }
}
