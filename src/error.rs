use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Unified error type for the core services. Handlers return
/// `Result<_, AppError>` and the `ResponseError` impl maps each variant
/// to a status code and a JSON `{"message": ...}` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input shape, e.g. end_date before start_date.
    #[error("{0}")]
    Validation(String),

    /// The employee already has a pending or approved request
    /// intersecting the submitted range.
    #[error("an overlapping pending/approved request already exists")]
    Overlap,

    /// Department already has `count` approved leave-takers in the range,
    /// at or above the configured `limit`.
    #[error("department already has {count} approved on leave (limit {limit})")]
    ThresholdExceeded { count: i64, limit: i64 },

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A decision was already made for this request. Decisions are
    /// single-shot; terminal states are never left.
    #[error("leave request already decided")]
    AlreadyDecided,

    #[error("file type {0:?} is not allowed")]
    UnsupportedFileType(String),

    #[error("invalid credentials")]
    Auth,

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnsupportedFileType(_) => StatusCode::BAD_REQUEST,
            AppError::Auth => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Overlap | AppError::ThresholdExceeded { .. } | AppError::AlreadyDecided => {
                StatusCode::CONFLICT
            }
            AppError::Storage(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self, AppError::Storage(_) | AppError::Io(_)) {
            tracing::error!(error = %self, "internal error");
            // don't leak storage details to the caller
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
