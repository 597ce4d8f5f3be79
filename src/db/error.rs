use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::common::ApiResponse;

/// Failure of a store or repository call, tagged by kind instead of by a
/// vendor-specific code string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataAccessError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error ({code}): {message}")]
    Transport { code: String, message: String },
}

impl DataAccessError {
    /// Map a Google API status name (e.g. `PERMISSION_DENIED`) to a variant.
    pub fn from_status(status: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            "NOT_FOUND" => Self::NotFound(message),
            "PERMISSION_DENIED" | "UNAUTHENTICATED" => Self::PermissionDenied(message),
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => {
                Self::InvalidArgument(message)
            }
            "UNAVAILABLE" => Self::Unavailable(message),
            other => Self::Transport {
                code: other.to_lowercase().replace('_', "-"),
                message,
            },
        }
    }

    /// Vendor-style code, as shown in logs and error bodies.
    pub fn code(&self) -> &str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::PermissionDenied(_) => "permission-denied",
            Self::InvalidArgument(_) => "invalid-argument",
            Self::Unavailable(_) => "unavailable",
            Self::Transport { code, .. } => code,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

impl From<reqwest::Error> for DataAccessError {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_timeout() {
            "deadline-exceeded"
        } else if e.is_decode() {
            "data-loss"
        } else {
            "transport"
        };
        Self::Transport {
            code: code.to_string(),
            message: e.to_string(),
        }
    }
}

impl ResponseError for DataAccessError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Transport { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error_with_message(
            self.to_string(),
            self.code(),
        ))
    }
}
