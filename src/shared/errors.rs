use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{domain::validation::ValidationError, interfaces::http::response::error_response};

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Failures the caller cannot fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Persistence(_))
    }
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("event serialization failed: {0}")]
    Serialization(String),
    #[error("event delivery failed: {0}")]
    Delivery(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("{message}")]
    Conflict { message: String },
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(err) => ApiError::bad_request(err.to_string()),
            DomainError::UserAlreadyExists => ApiError::Conflict {
                message: "user already exists".to_string(),
            },
            DomainError::Persistence(_) => ApiError::Internal,
        }
    }
}
