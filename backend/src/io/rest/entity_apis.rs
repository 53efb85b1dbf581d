//! # REST API for Entity Collections
//!
//! The same four endpoints are mounted for every owner-scoped collection:
//! list and create on the collection path, replace and delete on
//! `{collection}/:id`.

use axum::{
    extract::{FromRef, Path, State},
    http::{StatusCode, Uri},
    response::Json,
    routing::{get, put},
    Router,
};
use shared::api::{DeleteResponse, EntityListResponse};
use shared::Record;
use tracing::info;

use crate::domain::{AppError, EntityService};
use crate::io::rest::session::CurrentUser;
use crate::AppState;

/// Mount the CRUD endpoints for `E` under `base`.
pub fn routes<E: Record>(router: Router<AppState>, base: &str) -> Router<AppState>
where
    EntityService<E>: FromRef<AppState>,
{
    router
        .route(base, get(list_entities::<E>).post(create_entity::<E>))
        .route(
            &format!("{base}/:id"),
            put(update_entity::<E>).delete(delete_entity::<E>),
        )
}

pub async fn list_entities<E: Record>(
    State(service): State<EntityService<E>>,
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<EntityListResponse<E>>, AppError> {
    info!("GET {}", uri);
    let items = service.list(&user_id).await?;
    Ok(Json(EntityListResponse { items }))
}

pub async fn create_entity<E: Record>(
    State(service): State<EntityService<E>>,
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
    Json(draft): Json<E::Draft>,
) -> Result<(StatusCode, Json<E>), AppError> {
    info!("POST {}", uri);
    let record = service.create(&user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_entity<E: Record>(
    State(service): State<EntityService<E>>,
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(draft): Json<E::Draft>,
) -> Result<Json<E>, AppError> {
    info!("PUT {}", uri);
    let record = service.update(&user_id, &id, draft).await?;
    Ok(Json(record))
}

pub async fn delete_entity<E: Record>(
    State(service): State<EntityService<E>>,
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    info!("DELETE {}", uri);
    service.delete(&user_id, &id).await?;
    Ok(Json(DeleteResponse {
        id,
        success_message: format!("Deleted from {}", E::COLLECTION),
    }))
}
