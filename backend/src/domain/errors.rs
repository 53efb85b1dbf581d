use shared::ValidationError;
use thiserror::Error;

/// Failure of a domain operation
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("sign in required")]
    AuthRequired,

    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: String },

    #[error("store operation failed: {0}")]
    Store(#[from] anyhow::Error),

    #[error("the backend store is not configured")]
    NotConfigured,

    #[error("another action is still in progress")]
    Busy,
}

impl AppError {
    pub fn not_found(collection: &'static str, id: &str) -> Self {
        AppError::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Stable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::AuthRequired => "auth_required",
            AppError::NotFound { .. } => "not_found",
            AppError::Store(_) => "store",
            AppError::NotConfigured => "not_configured",
            AppError::Busy => "busy",
        }
    }
}
