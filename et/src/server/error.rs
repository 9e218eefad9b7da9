//! Mapping tracker errors onto HTTP responses

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::TrackerError;

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    Tracker(TrackerError),
    /// Body missing, not JSON, or not the expected shape
    BadRequest(String),
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        ApiError::Tracker(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Tracker(e) => match e {
                TrackerError::Validation { .. } => StatusCode::BAD_REQUEST,
                TrackerError::DuplicateName(_) => StatusCode::CONFLICT,
                TrackerError::ProtectedEntity(_) => StatusCode::FORBIDDEN,
                TrackerError::NotFound { .. } => StatusCode::NOT_FOUND,
                TrackerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
                TrackerError::ChannelClosed => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            ApiError::BadRequest(message) => ErrorBody {
                message: format!("Invalid request body: {}", message),
                errors: Vec::new(),
            },
            ApiError::Tracker(TrackerError::Validation { field, message }) => ErrorBody {
                message: format!("Invalid {}", field),
                errors: vec![FieldError { field, message }],
            },
            // Storage details stay in the log
            ApiError::Tracker(TrackerError::Persistence(_)) => ErrorBody {
                message: "Failed to save changes, please try again".to_string(),
                errors: Vec::new(),
            },
            ApiError::Tracker(e) => ErrorBody {
                message: e.to_string(),
                errors: Vec::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Tracker(e @ (TrackerError::Persistence(_) | TrackerError::ChannelClosed)) => {
                error!(error = %e, %status, "Request failed");
            }
            other => warn!(error = ?other, %status, "Request rejected"),
        }
        (status, Json(self.body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
