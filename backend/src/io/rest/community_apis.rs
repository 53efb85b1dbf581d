//! Community board endpoints beyond plain CRUD: search, likes and replies.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use shared::api::{EntityListResponse, SearchQuery};
use shared::community::filter_posts;
use shared::{CommunityPost, CommunityReply, PostCategory, ReplyDraft};
use tracing::info;

use crate::domain::{AppError, EntityService};
use crate::io::rest::care_apis::parse_category;
use crate::io::rest::session::CurrentUser;

/// GET /api/community/search?q=&category=
pub async fn search_posts(
    State(service): State<EntityService<CommunityPost>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<EntityListResponse<CommunityPost>>, AppError> {
    info!("GET /api/community/search - query: {:?}", query);
    let category = parse_category::<PostCategory>(query.category.as_deref())?;
    let posts = service.list(&user_id).await?;
    let items = filter_posts(&posts, query.q.as_deref().unwrap_or_default(), &category)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(EntityListResponse { items }))
}

pub async fn like_post(
    State(service): State<EntityService<CommunityPost>>,
    CurrentUser(user_id): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Json<CommunityPost>, AppError> {
    info!("POST /api/community/{}/like", post_id);
    Ok(Json(service.like_post(&user_id, &post_id).await?))
}

/// Answers 201 with the new reply only.
pub async fn add_reply(
    State(service): State<EntityService<CommunityPost>>,
    CurrentUser(user_id): CurrentUser,
    Path(post_id): Path<String>,
    Json(draft): Json<ReplyDraft>,
) -> Result<(StatusCode, Json<CommunityReply>), AppError> {
    info!("POST /api/community/{}/replies", post_id);
    let reply = service.add_reply(&user_id, &post_id, draft).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn like_reply(
    State(service): State<EntityService<CommunityPost>>,
    CurrentUser(user_id): CurrentUser,
    Path((post_id, reply_id)): Path<(String, String)>,
) -> Result<Json<CommunityPost>, AppError> {
    info!("POST /api/community/{}/replies/{}/like", post_id, reply_id);
    Ok(Json(service.like_reply(&user_id, &post_id, &reply_id).await?))
}
