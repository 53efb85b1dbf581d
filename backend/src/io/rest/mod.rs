//! # REST Layer
//!
//! Axum handlers. Each one extracts the caller's session, delegates to a
//! domain service and maps [`AppError`](crate::domain::AppError) onto an
//! HTTP status.
//!
//! The session is extracted before any service is consulted, so a request
//! without a user id gets 401 even when no store is configured.

pub mod care_apis;
pub mod community_apis;
pub mod crisis_apis;
pub mod entity_apis;
pub mod errors;
pub mod session;
pub mod support_apis;

pub use session::{CurrentUser, USER_ID_HEADER};
