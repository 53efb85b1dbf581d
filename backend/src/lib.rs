//! # CareNest Backend
//!
//! HTTP API over the caregiver's records: diary, behaviors, routines,
//! care plan, sensory triggers, crisis records, school messages, medical
//! reports, appointments and the community board, plus crisis mode, the
//! assistant chat, emergency numbers and care reports.
//!
//! Storage is optional. Without a database every record endpoint answers
//! 503 while the static features keep working.

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::Method,
    routing::{get, post},
    Router,
};
use shared::{
    Appointment, BehaviorEntry, CommunityPost, CrisisRecord, DiaryEntry, MedicalReport, Medication, Record,
    Routine, SchoolCommunication, SensoryTrigger, Therapy,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use config::AppConfig;
use domain::{ChatService, CrisisModeService, EmergencyService, EntityService, FixedLocation, ReportService};
use io::rest::{care_apis, community_apis, crisis_apis, entity_apis, support_apis};
use storage::{DbConnection, EntityRepository};

/// Shared state; handlers extract the single service they need.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub diary: EntityService<DiaryEntry>,
    pub behaviors: EntityService<BehaviorEntry>,
    pub routines: EntityService<Routine>,
    pub medications: EntityService<Medication>,
    pub therapies: EntityService<Therapy>,
    pub sensory_triggers: EntityService<SensoryTrigger>,
    pub crisis_records: EntityService<CrisisRecord>,
    pub school_communications: EntityService<SchoolCommunication>,
    pub medical_reports: EntityService<MedicalReport>,
    pub community_posts: EntityService<CommunityPost>,
    pub appointments: EntityService<Appointment>,
    pub crisis_mode: CrisisModeService,
    pub chat: ChatService,
    pub emergency: EmergencyService,
    pub reports: ReportService,
}

fn service_for<E: Record>(db: Option<&DbConnection>) -> EntityService<E> {
    match db {
        Some(db) => EntityService::new(Arc::new(EntityRepository::<E>::new(db.clone()))),
        None => EntityService::unconfigured(),
    }
}

impl AppState {
    /// `None` for `db` leaves every collection unconfigured.
    pub fn new(db: Option<DbConnection>, chat: ChatService, emergency: EmergencyService) -> Self {
        let db = db.as_ref();
        let diary = service_for(db);
        let behaviors = service_for(db);
        let routines = service_for(db);
        let medications = service_for(db);
        let therapies = service_for(db);
        let crisis_records = service_for(db);

        let reports = ReportService {
            diary: diary.clone(),
            behaviors: behaviors.clone(),
            crises: crisis_records.clone(),
            routines: routines.clone(),
            therapies: therapies.clone(),
            medications: medications.clone(),
        };

        let crisis_mode = CrisisModeService::new(crisis_records.clone());

        Self {
            diary,
            behaviors,
            routines,
            medications,
            therapies,
            sensory_triggers: service_for(db),
            crisis_records,
            school_communications: service_for(db),
            medical_reports: service_for(db),
            community_posts: service_for(db),
            appointments: service_for(db),
            crisis_mode,
            chat,
            emergency,
            reports,
        }
    }
}

/// Open the configured database (if any) and wire up every service.
pub async fn initialize_backend(config: &AppConfig) -> anyhow::Result<AppState> {
    let db = match &config.database_url {
        Some(url) => {
            info!("Connecting to database at {}", url);
            Some(DbConnection::new(url).await?)
        }
        None => {
            warn!("No database configured; record endpoints will answer 503");
            None
        }
    };

    let chat = ChatService::new(config.chat_delay, config.chat_seed);
    let emergency = EmergencyService::new(Arc::new(FixedLocation(config.default_country)));

    Ok(AppState::new(db, chat, emergency))
}

/// Every route of the API with CORS and request tracing applied.
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/diary/summary", get(care_apis::diary_summary))
        .route("/api/behaviors/search", get(care_apis::search_behaviors))
        .route("/api/library/behaviors", get(care_apis::behavior_library))
        .route("/api/medical-reports/sorted", get(care_apis::sorted_medical_reports))
        .route("/api/sensory-profile", get(care_apis::sensory_profile))
        .route("/api/appointments/upcoming", get(care_apis::upcoming_appointments))
        .route("/api/routines/today", get(care_apis::todays_routines))
        .route(
            "/api/routines/:id/steps/:step_id/toggle",
            post(care_apis::toggle_routine_step),
        )
        .route("/api/crisis/resources", get(crisis_apis::crisis_resources))
        .route(
            "/api/crisis/session",
            post(crisis_apis::start_crisis_mode)
                .get(crisis_apis::crisis_mode_status)
                .delete(crisis_apis::cancel_crisis_mode),
        )
        .route("/api/crisis/session/triggers", post(crisis_apis::toggle_crisis_trigger))
        .route("/api/crisis/session/finish", post(crisis_apis::finish_crisis_mode))
        .route("/api/community/search", get(community_apis::search_posts))
        .route("/api/community/:id/like", post(community_apis::like_post))
        .route("/api/community/:id/replies", post(community_apis::add_reply))
        .route(
            "/api/community/:id/replies/:reply_id/like",
            post(community_apis::like_reply),
        )
        .route("/api/assistant/messages", post(support_apis::send_chat_message))
        .route("/api/assistant/prompts", get(support_apis::chat_prompts))
        .route("/api/emergency/contacts", get(support_apis::emergency_contacts))
        .route("/api/reports/care", post(support_apis::care_report));

    let router = entity_apis::routes::<DiaryEntry>(router, "/api/diary");
    let router = entity_apis::routes::<BehaviorEntry>(router, "/api/behaviors");
    let router = entity_apis::routes::<Routine>(router, "/api/routines");
    let router = entity_apis::routes::<Medication>(router, "/api/medications");
    let router = entity_apis::routes::<Therapy>(router, "/api/therapies");
    let router = entity_apis::routes::<SensoryTrigger>(router, "/api/sensory-triggers");
    let router = entity_apis::routes::<CrisisRecord>(router, "/api/crisis-records");
    let router = entity_apis::routes::<SchoolCommunication>(router, "/api/school-communications");
    let router = entity_apis::routes::<MedicalReport>(router, "/api/medical-reports");
    let router = entity_apis::routes::<CommunityPost>(router, "/api/community");
    let router = entity_apis::routes::<Appointment>(router, "/api/appointments");

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
