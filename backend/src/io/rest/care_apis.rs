//! # REST API for Care Records
//!
//! Read-only views over the caregiver's records, plus the routine step
//! toggle.

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::Json,
};
use chrono::{Datelike, Utc};
use shared::api::{EntityListResponse, MedicalReportQuery, SearchQuery, SensoryProfileQuery};
use shared::appointment::upcoming;
use shared::behavior::{filter_behavior_entries, filter_behavior_library};
use shared::medical_report::sort_reports;
use shared::record::split_list;
use shared::{
    Appointment, BehaviorCategory, BehaviorEntry, BehaviorGuide, CategoryFilter, DiaryEntry, MedicalReport,
    MoodSummary, Routine, SensoryProfile, SensoryTrigger, ValidationError, Weekday,
};
use tracing::info;

use crate::domain::{AppError, EntityService};
use crate::io::rest::session::CurrentUser;

/// Mood and crisis totals over the whole diary
pub async fn diary_summary(
    State(service): State<EntityService<DiaryEntry>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<MoodSummary>, AppError> {
    info!("GET /api/diary/summary");
    let entries = service.list(&user_id).await?;
    Ok(Json(MoodSummary::from_entries(&entries)))
}

pub async fn search_behaviors(
    State(service): State<EntityService<BehaviorEntry>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<EntityListResponse<BehaviorEntry>>, AppError> {
    info!("GET /api/behaviors/search - query: {:?}", query);
    let entries = service.list(&user_id).await?;
    let items = filter_behavior_entries(&entries, query.q.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(EntityListResponse { items }))
}

/// Static catalog; no session needed.
pub async fn behavior_library(
    uri: Uri,
    Query(query): Query<SearchQuery>,
) -> Result<Json<EntityListResponse<BehaviorGuide>>, AppError> {
    info!("GET {}", uri);
    let category = parse_category::<BehaviorCategory>(query.category.as_deref())?;
    let items = filter_behavior_library(query.q.as_deref().unwrap_or_default(), &category)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(EntityListResponse { items }))
}

pub async fn sorted_medical_reports(
    State(service): State<EntityService<MedicalReport>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<MedicalReportQuery>,
) -> Result<Json<EntityListResponse<MedicalReport>>, AppError> {
    let order = query.order.unwrap_or_default();
    info!("GET /api/medical-reports/sorted - order: {:?}", order);
    let reports = service.list(&user_id).await?;
    Ok(Json(EntityListResponse {
        items: sort_reports(&reports, order),
    }))
}

pub async fn toggle_routine_step(
    State(service): State<EntityService<Routine>>,
    CurrentUser(user_id): CurrentUser,
    Path((routine_id, step_id)): Path<(String, String)>,
) -> Result<Json<Routine>, AppError> {
    info!("POST /api/routines/{}/steps/{}/toggle", routine_id, step_id);
    let routine = service.toggle_step(&user_id, &routine_id, &step_id).await?;
    Ok(Json(routine))
}

/// Routines scheduled for the current weekday (UTC)
pub async fn todays_routines(
    State(service): State<EntityService<Routine>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<EntityListResponse<Routine>>, AppError> {
    let today = Weekday::from_chrono(Utc::now().weekday());
    info!("GET /api/routines/today - {:?}", today);
    let items = service
        .list(&user_id)
        .await?
        .into_iter()
        .filter(|routine| routine.runs_on(today))
        .collect();
    Ok(Json(EntityListResponse { items }))
}

pub async fn upcoming_appointments(
    State(service): State<EntityService<Appointment>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<EntityListResponse<Appointment>>, AppError> {
    info!("GET /api/appointments/upcoming");
    let appointments = service.list(&user_id).await?;
    Ok(Json(EntityListResponse {
        items: upcoming(&appointments, Utc::now().naive_utc()),
    }))
}

/// `safe` and `calming` are comma-separated lists.
pub async fn sensory_profile(
    State(service): State<EntityService<SensoryTrigger>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<SensoryProfileQuery>,
) -> Result<Json<SensoryProfile>, AppError> {
    info!("GET /api/sensory-profile");
    let triggers = service.list(&user_id).await?;
    Ok(Json(SensoryProfile::from_triggers(
        &triggers,
        split_list(query.safe.as_deref().unwrap_or_default()),
        split_list(query.calming.as_deref().unwrap_or_default()),
    )))
}

/// Parses a `category` query value, rejecting names that are not categories.
pub(crate) fn parse_category<T>(raw: Option<&str>) -> Result<CategoryFilter<T>, ValidationError>
where
    T: serde::de::DeserializeOwned,
{
    CategoryFilter::parse(raw).ok_or_else(|| ValidationError::UnknownValue {
        field: "category".to_string(),
        value: raw.unwrap_or_default().to_string(),
    })
}
