//! Common shape of every owner-scoped record and the validation helpers the
//! entity drafts share.

use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner id used for records created while no session is available.
pub const LOCAL_OWNER: &str = "local";

/// A persisted, owner-scoped record.
///
/// Records are created from a `Draft` (the caller-supplied fields only) and
/// updated by replacing every draft field at once. `id`, `user_id` and
/// `created_at` never change after creation.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Validate + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Name of the collection (and storage table) holding this record type.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Key used to order a collection newest first. Dated records use their
    /// date; undated ones fall back to the creation timestamp.
    fn recency_key(&self) -> String {
        timestamp_key(self.created_at())
    }

    fn from_draft(meta: RecordMeta, draft: Self::Draft) -> Self;

    /// Full-record replace of every caller-supplied field.
    fn replace(&mut self, draft: Self::Draft);
}

/// Fields assigned by the system when a record is created.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMeta {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl RecordMeta {
    /// Fresh metadata for a record owned by `user_id`.
    pub fn new(user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Lexicographically sortable rendering of a timestamp.
pub fn timestamp_key(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Client-side validation run before any store call.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Field-level validation failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },
    #[error("{field} must be a time in HH:MM format, got '{value}'")]
    InvalidTime { field: String, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange { field: String, min: i64, max: i64, value: i64 },
    #[error("a routine needs at least one step")]
    NoSteps,
    #[error("period start {from} is after its end {to}")]
    InvalidPeriod { from: String, to: String },
    #[error("'{value}' is not a known {field}")]
    UnknownValue { field: String, value: String },
}

/// Fails with `MissingField` when `value` is empty or whitespace only.
pub fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Accepts 24h `HH:MM` only.
pub fn require_clock_time(field: &str, value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok();
    if !well_formed {
        return Err(ValidationError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn require_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Trims an optional text field, turning blank input into `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a comma-separated list, dropping blank items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Day of the week used by routines and therapy schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_whitespace() {
        assert!(require("notes", "hello").is_ok());
        assert_eq!(
            require("notes", "   \t"),
            Err(ValidationError::MissingField { field: "notes".to_string() })
        );
    }

    #[test]
    fn test_require_clock_time() {
        assert!(require_clock_time("time", "08:00").is_ok());
        assert!(require_clock_time("time", "23:59").is_ok());
        assert!(require_clock_time("time", "24:00").is_err());
        assert!(require_clock_time("time", "8:00").is_err());
        assert!(require_clock_time("time", "08:00:00").is_err());
        assert!(require_clock_time("time", "noon").is_err());
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(" routine, transition ,, tips "),
            vec!["routine", "transition", "tips"]
        );
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_record_meta_ids_are_unique() {
        let a = RecordMeta::new("parent-1");
        let b = RecordMeta::new("parent-1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.user_id, "parent-1");
    }

    #[test]
    fn test_weekday_serializes_lowercase() {
        let json = serde_json::to_string(&Weekday::Wednesday).unwrap();
        assert_eq!(json, "\"wednesday\"");
    }

    #[test]
    fn test_weekday_from_calendar_date() {
        // 2026-10-16 is a Friday
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(Weekday::from_chrono(chrono::Datelike::weekday(&date)), Weekday::Friday);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Sunday);
    }
}
