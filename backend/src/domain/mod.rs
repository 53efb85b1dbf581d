//! # Domain Module
//!
//! Business logic of the CareNest backend, independent of HTTP and of the
//! storage engine.
//!
//! ## Module Organization
//!
//! - **entity_service**: owner-scoped CRUD over any collection
//! - **controller**: per-session list state with loading/saving flags
//! - **routine_service** / **community_service**: step toggling, likes and replies
//! - **chat_service**: the simulated assistant
//! - **crisis_mode**: crisis timer and the per-user crisis screens that log records
//! - **emergency_service**: emergency numbers for the caller's country
//! - **report_service**: care reports over a period
//! - **errors**: the `AppError` taxonomy shared by all of the above
//!
//! ## Business Rules
//!
//! - Required fields are validated before any store call
//! - Every read and write is scoped to the owning user
//! - Updates replace every caller-supplied field; ids, owners and creation
//!   times never change
//! - Deleting a missing record is not an error

pub mod chat_service;
pub mod community_service;
pub mod controller;
pub mod crisis_mode;
pub mod emergency_service;
pub mod entity_service;
pub mod errors;
pub mod report_service;
pub mod routine_service;

pub use chat_service::{ChatService, ChatSession, ChatState};
pub use controller::{ActivityStatus, EntityController};
pub use crisis_mode::{CrisisModeService, CrisisModeSession, CrisisTimer};
pub use emergency_service::{EmergencyService, FixedLocation, LocationResolver};
pub use entity_service::EntityService;
pub use errors::AppError;
pub use report_service::{CareData, ReportBuilder, ReportService};
