//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::api::ErrorBody;
use tracing::error;

use crate::domain::AppError;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AuthRequired => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Busy => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Store details stay in the logs
        let message = match &self {
            AppError::Store(cause) => {
                error!("Store failure: {:#}", cause);
                GENERIC_FAILURE.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.code().to_string(),
            message,
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation(ValidationError::NoSteps), StatusCode::BAD_REQUEST),
            (AppError::AuthRequired, StatusCode::UNAUTHORIZED),
            (AppError::not_found("diary_entries", "x"), StatusCode::NOT_FOUND),
            (AppError::Store(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::NotConfigured, StatusCode::SERVICE_UNAVAILABLE),
            (AppError::Busy, StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_store_error_body_is_generic() {
        let response = AppError::Store(anyhow::anyhow!("database is locked")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body.error, "store");
        assert_eq!(body.message, GENERIC_FAILURE);
        assert!(!body.message.contains("locked"));
    }
}
