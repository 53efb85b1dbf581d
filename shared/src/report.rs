//! Care report request and result shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::diary::MoodSummary;
use crate::record::ValidationError;
use crate::sensory::Severity;

/// Time window a report covers, ending today for the relative periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl ReportPeriod {
    /// Inclusive date range covered by this period.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let days_back = match self {
            ReportPeriod::Week => 6,
            ReportPeriod::Month => 29,
            ReportPeriod::Quarter => 89,
            ReportPeriod::Custom { from, to } => {
                if from > to {
                    return Err(ValidationError::InvalidPeriod {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                return Ok((*from, *to));
            }
        };
        let from = today.checked_sub_days(Days::new(days_back)).unwrap_or(NaiveDate::MIN);
        Ok((from, today))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Behavior,
    Crisis,
    Routine,
    Food,
    Sleep,
    Therapy,
    Medication,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 7] = [
        ReportCategory::Behavior,
        ReportCategory::Crisis,
        ReportCategory::Routine,
        ReportCategory::Food,
        ReportCategory::Sleep,
        ReportCategory::Therapy,
        ReportCategory::Medication,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareReportRequest {
    #[serde(default)]
    pub period: ReportPeriod,
    /// Empty selects every category
    #[serde(default)]
    pub categories: Vec<ReportCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSection {
    pub summary: MoodSummary,
    /// Most logged foods with their counts, most frequent first
    pub top_foods: Vec<(String, u32)>,
}

/// Built from diary entries that carry a sleep log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSection {
    pub nights_logged: u32,
    pub average_hours: f64,
    pub average_night_wakings: f64,
    /// Most frequent bedtime; earliest wins a tie
    pub usual_bedtime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisSection {
    pub crisis_count: u32,
    /// Minutes; 0.0 when no crisis was recorded
    pub average_duration: f64,
    pub top_triggers: Vec<(String, u32)>,
    pub strategies_that_worked: Vec<String>,
    /// Only intensities that occur are present
    pub by_intensity: BTreeMap<Severity, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSection {
    pub entry_count: u32,
    /// Distinct behaviors with occurrence counts
    pub behaviors: BTreeMap<String, u32>,
    pub with_medical_details: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineProgress {
    pub routine_id: String,
    pub name: String,
    pub progress: f64,
    /// Sum of step durations
    pub total_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineSection {
    pub routines: Vec<RoutineProgress>,
    pub average_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapySection {
    pub active_count: u32,
    pub therapies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationSection {
    pub active_count: u32,
    /// `name dosage` per active medication
    pub medications: Vec<String>,
    pub daily_doses: u32,
}

/// Generated report; a section is present only when its category was selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<ReportCategory>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub behavior: Option<BehaviorSection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crisis: Option<CrisisSection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub routine: Option<RoutineSection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub food: Option<FoodSection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sleep: Option<SleepSection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub therapy: Option<TherapySection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub medication: Option<MedicationSection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_relative_periods_end_today() {
        let today = day(2026, 10, 16);
        assert_eq!(ReportPeriod::Week.resolve(today).unwrap(), (day(2026, 10, 10), today));
        assert_eq!(ReportPeriod::Month.resolve(today).unwrap(), (day(2026, 9, 17), today));
        assert_eq!(ReportPeriod::Quarter.resolve(today).unwrap().0, day(2026, 7, 19));
    }

    #[test]
    fn test_custom_period_must_be_ordered() {
        let today = day(2026, 10, 16);
        let ok = ReportPeriod::Custom { from: day(2026, 1, 1), to: day(2026, 1, 31) };
        assert_eq!(ok.resolve(today).unwrap(), (day(2026, 1, 1), day(2026, 1, 31)));

        let inverted = ReportPeriod::Custom { from: day(2026, 2, 1), to: day(2026, 1, 1) };
        assert!(matches!(inverted.resolve(today), Err(ValidationError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_request_wire_format() {
        let req: CareReportRequest = serde_json::from_str(
            r#"{"period":{"kind":"custom","from":"2026-01-01","to":"2026-01-31"},"categories":["crisis","food","sleep"]}"#,
        )
        .unwrap();
        assert_eq!(
            req.categories,
            vec![ReportCategory::Crisis, ReportCategory::Food, ReportCategory::Sleep]
        );

        let default: CareReportRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(default.period, ReportPeriod::Month);
        assert!(default.categories.is_empty());
    }
}
