use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use super::validation::FieldError;
use crate::services::{AuthError, PictureError, RoomError, StorageError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    /// DTO validation: a structured list of field-level messages.
    ValidationFailed(Vec<FieldError>),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::ValidationFailed(errors) => {
                write!(f, "Validation failed ({} field errors)", errors.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::ValidationFailed(errors) => {
                let body =
                    ApiResponse::<()>::field_errors("invalid inputs", errors.clone());
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Blocked { .. } => ApiError::Unauthorized(err.to_string()),
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotAnOwner | RoomError::WrongOwner => {
                ApiError::ValidationError(err.to_string())
            }
            RoomError::NotFound => ApiError::NotFound(err.to_string()),
            RoomError::Validation(msg) => ApiError::ValidationError(msg),
            RoomError::Database(msg) => ApiError::DatabaseError(msg),
            RoomError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<PictureError> for ApiError {
    fn from(err: PictureError) -> Self {
        match err {
            PictureError::InvalidInput(msg) => ApiError::ValidationError(msg),
            PictureError::NotAnOwner | PictureError::WrongOwner => {
                ApiError::ValidationError(err.to_string())
            }
            PictureError::NotFound | PictureError::RoomNotFound => {
                ApiError::NotFound(err.to_string())
            }
            PictureError::Database(msg) => ApiError::DatabaseError(msg),
            PictureError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooManyFiles { .. } | StorageError::FileTooLarge { .. } => {
                ApiError::ValidationError(err.to_string())
            }
            StorageError::Io(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
