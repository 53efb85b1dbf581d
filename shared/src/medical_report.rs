//! Medical reports attached as opaque file references.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{non_blank, require, Record, RecordMeta, Validate, ValidationError};

/// Extensions the upload control suggests; anything else is still accepted.
pub const SUGGESTED_ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

pub fn is_suggested_attachment(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            SUGGESTED_ATTACHMENT_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Consultation,
    Exam,
    Prescription,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalReportDraft {
    pub file_name: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub report_type: ReportType,
    pub date: NaiveDate,
    pub doctor_name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub personal_notes: Option<String>,
}

impl Validate for MedicalReportDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("file_name", &self.file_name)?;
        require("doctor_name", &self.doctor_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub file_url: String,
    pub report_type: ReportType,
    pub date: NaiveDate,
    pub doctor_name: String,
    pub specialty: String,
    pub personal_notes: Option<String>,
}

impl Record for MedicalReport {
    type Draft = MedicalReportDraft;
    const COLLECTION: &'static str = "medical_reports";

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

    fn from_draft(meta: RecordMeta, draft: MedicalReportDraft) -> Self {
        Self {
            id: meta.id,
            user_id: meta.user_id,
            created_at: meta.created_at,
            file_name: draft.file_name.trim().to_string(),
            file_url: draft.file_url,
            report_type: draft.report_type,
            date: draft.date,
            doctor_name: draft.doctor_name.trim().to_string(),
            specialty: draft.specialty.trim().to_string(),
            personal_notes: non_blank(draft.personal_notes),
        }
    }

    fn replace(&mut self, draft: MedicalReportDraft) {
        self.file_name = draft.file_name.trim().to_string();
        self.file_url = draft.file_url;
        self.report_type = draft.report_type;
        self.date = draft.date;
        self.doctor_name = draft.doctor_name.trim().to_string();
        self.specialty = draft.specialty.trim().to_string();
        self.personal_notes = non_blank(draft.personal_notes);
    }
}

/// How the report list is organised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportOrder {
    /// Newest first
    #[default]
    Date,
    /// Doctor name A to Z
    Doctor,
    /// Specialty A to Z
    Specialty,
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Returns a sorted copy; the source list keeps its order.
pub fn sort_reports(reports: &[MedicalReport], order: ReportOrder) -> Vec<MedicalReport> {
    let mut sorted = reports.to_vec();
    match order {
        ReportOrder::Date => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        ReportOrder::Doctor => sorted.sort_by(|a, b| compare_text(&a.doctor_name, &b.doctor_name)),
        ReportOrder::Specialty => sorted.sort_by(|a, b| compare_text(&a.specialty, &b.specialty)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(doctor: &str, specialty: &str, day: u32) -> MedicalReport {
        MedicalReport::from_draft(
            RecordMeta::new("parent-1"),
            MedicalReportDraft {
                file_name: "report.pdf".to_string(),
                file_url: "blob:report".to_string(),
                report_type: ReportType::Consultation,
                date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
                doctor_name: doctor.to_string(),
                specialty: specialty.to_string(),
                personal_notes: None,
            },
        )
    }

    #[test]
    fn test_sort_by_doctor() {
        let reports = vec![report("Dr. B", "Neurology", 1), report("Dr. A", "Pediatrics", 2)];
        let doctors: Vec<String> = sort_reports(&reports, ReportOrder::Doctor)
            .into_iter()
            .map(|r| r.doctor_name)
            .collect();
        assert_eq!(doctors, vec!["Dr. A", "Dr. B"]);
        // source untouched
        assert_eq!(reports[0].doctor_name, "Dr. B");
    }

    #[test]
    fn test_sort_by_date_and_specialty() {
        let reports = vec![
            report("Dr. A", "pediatrics", 3),
            report("Dr. B", "Neurology", 9),
            report("Dr. C", "genetics", 5),
        ];

        let by_date: Vec<u32> = sort_reports(&reports, ReportOrder::Date)
            .iter()
            .map(|r| chrono::Datelike::day(&r.date))
            .collect();
        assert_eq!(by_date, vec![9, 5, 3]);

        let by_specialty: Vec<String> = sort_reports(&reports, ReportOrder::Specialty)
            .into_iter()
            .map(|r| r.specialty)
            .collect();
        assert_eq!(by_specialty, vec!["genetics", "Neurology", "pediatrics"]);
    }

    #[test]
    fn test_required_fields() {
        let draft = MedicalReportDraft {
            file_name: "exam.png".to_string(),
            file_url: String::new(),
            report_type: ReportType::Exam,
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            doctor_name: "  ".to_string(),
            specialty: String::new(),
            personal_notes: None,
        };
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField { field: "doctor_name".to_string() })
        );
    }

    #[test]
    fn test_suggested_attachments() {
        assert!(is_suggested_attachment("scan.PDF"));
        assert!(is_suggested_attachment("photo.jpeg"));
        assert!(!is_suggested_attachment("notes.docx"));
        assert!(!is_suggested_attachment("no_extension"));
    }
}
