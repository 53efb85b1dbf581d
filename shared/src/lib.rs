//! Types and pure domain logic shared by the CareNest backend and its clients.
//!
//! Every persisted entity implements [`Record`] and is created from its
//! `*Draft` companion after [`Validate::validate`] succeeds.

pub mod api;
pub mod appointment;
pub mod behavior;
pub mod care_plan;
pub mod chat;
pub mod community;
pub mod crisis;
pub mod diary;
pub mod emergency;
pub mod filter;
pub mod locale;
pub mod medical_report;
pub mod record;
pub mod report;
pub mod routine;
pub mod school;
pub mod sensory;

pub use appointment::{Appointment, AppointmentDraft};
pub use behavior::{BehaviorCategory, BehaviorDraft, BehaviorEntry, BehaviorGuide, BEHAVIOR_LIBRARY};
pub use care_plan::{Medication, MedicationDraft, Therapy, TherapyDraft, TherapySchedule};
pub use chat::{ChatMessage, ChatRole};
pub use community::{CommunityPost, CommunityPostDraft, CommunityReply, PostCategory, ReplyDraft};
pub use crisis::{CrisisRecord, CrisisRecordDraft, Effectiveness};
pub use diary::{CrisisDetails, DiaryDraft, DiaryEntry, Meals, Mood, MoodSummary, SleepLog};
pub use emergency::{CountryCode, EmergencyContacts};
pub use filter::CategoryFilter;
pub use locale::{Locale, Notice};
pub use medical_report::{MedicalReport, MedicalReportDraft, ReportOrder, ReportType};
pub use record::{Record, RecordMeta, Validate, ValidationError, Weekday, LOCAL_OWNER};
pub use report::{CareReport, CareReportRequest, ReportCategory, ReportPeriod};
pub use routine::{Routine, RoutineDraft, RoutineStep};
pub use school::{MessageSource, SchoolCommunication, SchoolCommunicationDraft, SchoolMood};
pub use sensory::{SensoryProfile, SensoryTrigger, SensoryTriggerDraft, Severity, TriggerType};
