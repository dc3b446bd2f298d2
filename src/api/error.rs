// =============================================================================
// API Errors: mapping failures onto HTTP responses
// =============================================================================
//
//   Validation            => 422 Unprocessable Entity
//   InsufficientData      => 422
//   UndefinedCorrelation  => 422
//   InvalidParameter      => 400 Bad Request
//   Rejection             => status chosen by the failed extractor
//                            (400 / 413 / 415 / 422)
//
// Body: {"error": "<kind>", "detail": "<message>"}
// =============================================================================

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::AnalyticsError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body violates a bar invariant or a size limit.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The body or query string could not be extracted.
    #[error("{message}")]
    Rejection {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "validation_error"
        };
        Self::Rejection {
            status,
            code,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejection {
            status: rejection.status(),
            code: "invalid_parameter",
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Analytics(e) => e.code(),
            Self::Rejection { code, .. } => *code,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Analytics(AnalyticsError::InvalidParameter(_)) => StatusCode::BAD_REQUEST,
            Self::Rejection { status, .. } => *status,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.code(),
            "detail": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
