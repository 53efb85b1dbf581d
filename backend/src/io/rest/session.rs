//! Session extraction. The authenticated user id arrives in a header set by
//! the identity provider in front of this service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Id of the signed-in user; rejects the request with 401 when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CurrentUser(id.to_string()))
            .ok_or(AppError::AuthRequired)
    }
}
