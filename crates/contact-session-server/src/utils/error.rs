use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::SessionError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unprocessable(msg) => {
                tracing::warn!("Unprocessable: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ApiError::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, "Too many requests".to_string())
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::PayloadTooLarge(msg) => {
                tracing::warn!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
            }
            ApiError::StorageError(msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidInput(msg) => ApiError::Unprocessable(msg.to_string()),
            SessionError::SessionFull => ApiError::Unprocessable(err.to_string()),
            SessionError::NotFound => ApiError::NotFound("session".to_string()),
            SessionError::RateLimited => ApiError::TooManyRequests,
            SessionError::IdExhausted | SessionError::Task(_) => {
                ApiError::Internal(err.to_string())
            }
            SessionError::Storage(e) => ApiError::StorageError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;

    fn status_of(err: SessionError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_session_errors_map_to_statuses() {
        assert_eq!(
            status_of(SessionError::InvalidInput("Missing fields")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(SessionError::SessionFull), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(SessionError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(SessionError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            status_of(SessionError::Storage(StoreError::InvalidId("x/y".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_full_session_keeps_message() {
        match ApiError::from(SessionError::SessionFull) {
            ApiError::Unprocessable(msg) => assert_eq!(msg, "Session full"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
