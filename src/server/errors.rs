use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ValidationError;
use crate::persistence::PersistenceError;

/// Body of every error answered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("{code}: {message}")]
    BadRequest { code: String, message: String },

    #[error("{code}: {message}")]
    NotFound { code: String, message: String },

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_message(self) -> ErrorMessage {
        match self {
            ApiError::BadRequest { code, message } | ApiError::NotFound { code, message } => {
                ErrorMessage { code, message }
            }
            ApiError::PayloadTooLarge(message) => ErrorMessage {
                code: "payload_too_large".to_string(),
                message,
            },
            ApiError::Internal(message) => ErrorMessage {
                code: "internal_error".to_string(),
                message,
            },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::BadRequest {
            code: error.code,
            message: error.message,
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::NotFound(_) => {
                ApiError::not_found("not_found_profile", error.to_string())
            }
            PersistenceError::Duplicated(_) => {
                ApiError::bad_request("bad_profile.id", error.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::bad_request("bad_json", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("bad_query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        // Missing parameters are a routing mistake, not a client one.
        if rejection.status().is_server_error() {
            return ApiError::Internal(rejection.body_text());
        }
        ApiError::bad_request("bad_path", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }
        (status, Json(self.into_message())).into_response()
    }
}
