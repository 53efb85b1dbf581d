//! Medical and therapy appointments, with the things to bring along.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{non_blank, require, require_clock_time, Record, RecordMeta, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    /// e.g. "Neuropediatrician"
    pub appointment_type: String,
    pub professional: String,
    pub date: NaiveDate,
    /// HH:MM
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub items_to_take: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for AppointmentDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("appointment_type", &self.appointment_type)?;
        require("professional", &self.professional)?;
        require_clock_time("time", &self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub appointment_type: String,
    pub professional: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub items_to_take: Vec<String>,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M")
            .ok()
            .map(|time| self.date.and_time(time))
    }
}

impl Record for Appointment {
    type Draft = AppointmentDraft;
    const COLLECTION: &'static str = "appointments";

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
        format!("{} {}", self.date, self.time)
    }

    fn from_draft(meta: RecordMeta, draft: AppointmentDraft) -> Self {
        let mut appointment = Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            appointment_type: String::new(),
            professional: String::new(),
            date: draft.date,
            time: String::new(),
            location: String::new(),
            items_to_take: Vec::new(),
            notes: None,
        };
        appointment.replace(draft);
        appointment
    }

    fn replace(&mut self, draft: AppointmentDraft) {
        self.appointment_type = draft.appointment_type.trim().to_string();
        self.professional = draft.professional.trim().to_string();
        self.date = draft.date;
        self.time = draft.time;
        self.location = draft.location.trim().to_string();
        self.items_to_take = draft
            .items_to_take
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        self.notes = non_blank(draft.notes);
    }
}

/// Appointments starting at or after `now`, soonest first.
pub fn upcoming(appointments: &[Appointment], now: NaiveDateTime) -> Vec<Appointment> {
    let mut ahead: Vec<(NaiveDateTime, &Appointment)> = appointments
        .iter()
        .filter_map(|a| a.starts_at().map(|at| (at, a)))
        .filter(|(at, _)| *at >= now)
        .collect();
    ahead.sort_by_key(|(at, _)| *at);
    ahead.into_iter().map(|(_, a)| a.clone()).collect()
}
