//! Visual routines made of timed, individually completable steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{require, require_clock_time, Record, RecordMeta, Validate, ValidationError, Weekday};

/// A single step in a routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineStep {
    /// Assigned when the routine is saved if left empty
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Minutes
    pub duration: u32,
    #[serde(default = "RoutineStep::default_icon")]
    pub icon: String,
    #[serde(default)]
    pub completed: bool,
}

impl RoutineStep {
    pub fn new(title: &str, duration: u32, icon: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            duration,
            icon: icon.to_string(),
            completed: false,
        }
    }

    fn default_icon() -> String {
        "⭐".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineDraft {
    pub name: String,
    /// HH:MM
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default)]
    pub steps: Vec<RoutineStep>,
}

impl Validate for RoutineDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_clock_time("time", &self.time)?;
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        for step in &self.steps {
            require("step title", &step.title)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub time: String,
    pub description: String,
    pub days: Vec<Weekday>,
    pub steps: Vec<RoutineStep>,
}

impl Routine {
    /// Flips the `completed` flag of one step. Returns false when the step
    /// does not belong to this routine.
    pub fn toggle_step(&mut self, step_id: &str) -> bool {
        match self.steps.iter_mut().find(|step| step.id == step_id) {
            Some(step) => {
                step.completed = !step.completed;
                true
            }
            None => false,
        }
    }

    /// Fraction of completed steps, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let done = self.steps.iter().filter(|step| step.completed).count();
        done as f64 / self.steps.len() as f64
    }

    pub fn total_duration(&self) -> u32 {
        self.steps.iter().map(|step| step.duration).sum()
    }

    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

impl Record for Routine {
    type Draft = RoutineDraft;
    const COLLECTION: &'static str = "routines";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(meta: RecordMeta, draft: RoutineDraft) -> Self {
        let mut routine = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            name: String::new(),
            time: String::new(),
            description: String::new(),
            days: Vec::new(),
            steps: Vec::new(),
        };
        routine.replace(draft);
        routine
    }

    fn replace(&mut self, draft: RoutineDraft) {
        self.name = draft.name.trim().to_string();
        self.time = draft.time;
        self.description = draft.description.trim().to_string();

        let mut days = draft.days;
        days.sort();
        days.dedup();
        self.days = days;

        self.steps = draft
            .steps
            .into_iter()
            .map(|mut step| {
                if step.id.trim().is_empty() {
                    step.id = Uuid::new_v4().to_string();
                }
                step.title = step.title.trim().to_string();
                step
            })
            .collect();
    }
}
