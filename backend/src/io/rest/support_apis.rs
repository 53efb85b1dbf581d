//! Assistant chat, emergency numbers and care reports.

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use shared::api::{
    ChatPromptsQuery, ChatPromptsResponse, DialLinks, EmergencyContactsQuery, EmergencyContactsResponse,
    SendChatMessageRequest, SendChatMessageResponse,
};
use shared::chat::{greeting, quick_prompts};
use shared::record::require;
use shared::{CareReport, CareReportRequest, ChatMessage, ChatRole, Locale};
use tracing::info;

use crate::domain::{AppError, ChatService, EmergencyService, ReportService};
use crate::io::rest::session::CurrentUser;

/// POST /api/assistant/messages
///
/// Answers after the configured reply delay. Conversations are not stored.
pub async fn send_chat_message(
    State(chat): State<ChatService>,
    Json(request): Json<SendChatMessageRequest>,
) -> Result<Json<SendChatMessageResponse>, AppError> {
    require("content", &request.content)?;
    info!("POST /api/assistant/messages - locale: {}", request.locale.code());

    let message = ChatMessage::new(ChatRole::User, request.content.trim());
    let reply = chat.reply(request.locale).await;
    Ok(Json(SendChatMessageResponse { message, reply }))
}

pub async fn chat_prompts(Query(query): Query<ChatPromptsQuery>) -> Json<ChatPromptsResponse> {
    let locale = query
        .locale
        .as_deref()
        .and_then(Locale::from_tag)
        .unwrap_or_default();
    Json(ChatPromptsResponse {
        locale,
        greeting: greeting(locale).to_string(),
        prompts: quick_prompts(locale).iter().map(|p| p.to_string()).collect(),
    })
}

/// Unsupported `country` values fall back to the resolved location.
pub async fn emergency_contacts(
    State(emergency): State<EmergencyService>,
    Query(query): Query<EmergencyContactsQuery>,
) -> Json<EmergencyContactsResponse> {
    let contacts = emergency.contacts(query.country.as_deref()).await;
    let dial = DialLinks {
        medical_emergency: EmergencyService::dial_uri(contacts.medical_emergency),
        psychological_support: EmergencyService::dial_uri(contacts.psychological_support),
        police: EmergencyService::dial_uri(contacts.police),
        ambulance: EmergencyService::dial_uri(contacts.ambulance),
    };
    Json(EmergencyContactsResponse { contacts, dial })
}

pub async fn care_report(
    State(reports): State<ReportService>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CareReportRequest>,
) -> Result<Json<CareReport>, AppError> {
    info!("POST /api/reports/care - period: {:?}", request.period);
    let today = Utc::now().date_naive();
    Ok(Json(reports.generate(&user_id, request, today).await?))
}
