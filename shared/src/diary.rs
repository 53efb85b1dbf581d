//! Mood and crisis diary entries and their aggregate summary.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{require, require_clock_time, require_range, Record, RecordMeta, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Sad,
    Angry,
    Anxious,
}

/// Which meals were eaten on the day, plus a snack count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Meals {
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
    pub snacks: u32,
}

impl Meals {
    /// Number of main meals (breakfast, lunch, dinner) marked as eaten.
    pub fn main_meal_count(&self) -> u32 {
        [self.breakfast, self.lunch, self.dinner]
            .iter()
            .filter(|eaten| **eaten)
            .count() as u32
    }
}

/// Crisis sub-record of a diary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CrisisDetails {
    pub occurred: bool,
    /// 1 (mild) to 10 (severe)
    pub intensity: Option<u8>,
    /// Minutes
    pub duration: Option<u32>,
}

/// Previous night's sleep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepLog {
    pub hours: f32,
    #[serde(default)]
    pub night_wakings: u32,
    /// HH:MM
    #[serde(default)]
    pub bedtime: Option<String>,
}

impl Validate for SleepLog {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=24.0).contains(&self.hours) {
            return Err(ValidationError::OutOfRange {
                field: "sleep.hours".to_string(),
                min: 0,
                max: 24,
                value: self.hours as i64,
            });
        }
        if let Some(bedtime) = &self.bedtime {
            require_clock_time("sleep.bedtime", bedtime)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryDraft {
    pub date: NaiveDate,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub food: Vec<String>,
    #[serde(default)]
    pub meals: Meals,
    #[serde(default)]
    pub crisis: CrisisDetails,
    #[serde(default)]
    pub sleep: Option<SleepLog>,
    pub notes: String,
}

impl Validate for DiaryDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("notes", &self.notes)?;
        if let Some(intensity) = self.crisis.intensity {
            require_range("crisis.intensity", intensity as i64, 1, 10)?;
        }
        if let Some(sleep) = &self.sleep {
            sleep.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub mood: Mood,
    pub food: Vec<String>,
    pub meals: Meals,
    pub crisis: CrisisDetails,
    #[serde(default)]
    pub sleep: Option<SleepLog>,
    pub notes: String,
}

impl Record for DiaryEntry {
    type Draft = DiaryDraft;
    const COLLECTION: &'static str = "diary_entries";

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

    fn from_draft(meta: RecordMeta, draft: DiaryDraft) -> Self {
        let mut entry = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            date: draft.date,
            mood: Mood::default(),
            food: Vec::new(),
            meals: Meals::default(),
            crisis: CrisisDetails::default(),
            sleep: None,
            notes: String::new(),
        };
        entry.replace(draft);
        entry
    }

    fn replace(&mut self, draft: DiaryDraft) {
        self.date = draft.date;
        self.mood = draft.mood;
        self.food = draft.food;
        self.meals = draft.meals;
        self.crisis = draft.crisis;
        self.sleep = draft.sleep;
        self.notes = draft.notes.trim().to_string();
    }
}

/// Aggregate over a diary list, recomputed from scratch on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MoodSummary {
    /// Only moods that occur at least once are present
    pub mood_counts: BTreeMap<Mood, u32>,
    pub crisis_count: u32,
    /// Mean number of main meals eaten per entry
    pub average_meals: f64,
    pub total_entries: u32,
}

impl MoodSummary {
    pub fn from_entries(entries: &[DiaryEntry]) -> Self {
        let mut mood_counts = BTreeMap::new();
        let mut crisis_count = 0;
        let mut meal_total = 0u32;

        for entry in entries {
            *mood_counts.entry(entry.mood).or_insert(0) += 1;
            if entry.crisis.occurred {
                crisis_count += 1;
            }
            meal_total += entry.meals.main_meal_count();
        }

        let average_meals = if entries.is_empty() {
            0.0
        } else {
            meal_total as f64 / entries.len() as f64
        };

        Self {
            mood_counts,
            crisis_count,
            average_meals,
            total_entries: entries.len() as u32,
        }
    }

    pub fn count(&self, mood: Mood) -> u32 {
        self.mood_counts.get(&mood).copied().unwrap_or(0)
    }

    /// Most frequent mood; ties resolve to the first in declaration order.
    pub fn dominant_mood(&self) -> Option<Mood> {
        self.mood_counts
            .iter()
            .fold(None, |best: Option<(Mood, u32)>, (mood, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((*mood, *count)),
            })
            .map(|(mood, _)| mood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mood: Mood, crisis: bool, meals: (bool, bool, bool)) -> DiaryEntry {
        DiaryEntry::from_draft(
            RecordMeta::new("parent-1"),
            DiaryDraft {
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                mood,
                food: vec![],
                meals: Meals {
                    breakfast: meals.0,
                    lunch: meals.1,
                    dinner: meals.2,
                    snacks: 0,
                },
                crisis: CrisisDetails {
                    occurred: crisis,
                    intensity: None,
                    duration: None,
                },
                sleep: None,
                notes: "calm day".to_string(),
            },
        )
    }

    #[test]
    fn test_mood_counts_and_crisis_count() {
        let entries = vec![
            entry(Mood::Happy, false, (true, true, true)),
            entry(Mood::Happy, true, (true, false, false)),
            entry(Mood::Sad, true, (false, false, false)),
        ];

        let summary = MoodSummary::from_entries(&entries);

        assert_eq!(summary.mood_counts.len(), 2);
        assert_eq!(summary.count(Mood::Happy), 2);
        assert_eq!(summary.count(Mood::Sad), 1);
        assert_eq!(summary.count(Mood::Angry), 0);
        assert_eq!(summary.crisis_count, 2);
        assert!((summary.average_meals - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.dominant_mood(), Some(Mood::Happy));
    }

    #[test]
    fn test_empty_summary() {
        let summary = MoodSummary::from_entries(&[]);
        assert!(summary.mood_counts.is_empty());
        assert_eq!(summary.crisis_count, 0);
        assert_eq!(summary.average_meals, 0.0);
        assert_eq!(summary.dominant_mood(), None);
    }

    #[test]
    fn test_diary_validation() {
        let mut draft = entry(Mood::Neutral, false, (false, false, false));
        let mut as_draft = DiaryDraft {
            date: draft.date,
            mood: draft.mood,
            food: vec![],
            meals: draft.meals,
            crisis: draft.crisis,
            sleep: None,
            notes: "  ".to_string(),
        };
        assert!(matches!(
            as_draft.validate(),
            Err(ValidationError::MissingField { .. })
        ));

        as_draft.notes = "slept well".to_string();
        as_draft.crisis.intensity = Some(11);
        assert!(matches!(
            as_draft.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));

        as_draft.crisis.intensity = Some(7);
        assert!(as_draft.validate().is_ok());

        draft.replace(as_draft);
        assert_eq!(draft.crisis.intensity, Some(7));
    }

    #[test]
    fn test_mood_defaults_to_neutral() {
        let draft: DiaryDraft =
            serde_json::from_str(r#"{"date":"2026-03-01","notes":"ok"}"#).unwrap();
        assert_eq!(draft.mood, Mood::Neutral);
        assert!(!draft.crisis.occurred);
        assert!(draft.sleep.is_none());
    }

    #[test]
    fn test_sleep_log_validation() {
        let mut draft: DiaryDraft = serde_json::from_str(
            r#"{"date":"2026-03-01","notes":"ok","sleep":{"hours":8.5,"night_wakings":2,"bedtime":"21:00"}}"#,
        )
        .unwrap();
        assert!(draft.validate().is_ok());

        let sleep = draft.sleep.as_mut().unwrap();
        sleep.bedtime = Some("9pm".to_string());
        assert!(matches!(draft.validate(), Err(ValidationError::InvalidTime { .. })));

        let sleep = draft.sleep.as_mut().unwrap();
        sleep.bedtime = None;
        sleep.hours = 25.0;
        assert!(matches!(draft.validate(), Err(ValidationError::OutOfRange { .. })));
    }
}
