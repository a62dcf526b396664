//! Status-code mapping shared by the HTTP adapters.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::DomainError;
use crate::repository::RepositoryError;

pub(crate) fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidFormat { .. }
        | DomainError::EmptyName
        | DomainError::NegativeCount { .. }
        | DomainError::CountOverflow { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } | DomainError::NotParked { .. } => StatusCode::NOT_FOUND,
        DomainError::AlreadyExists { .. }
        | DomainError::AlreadyParked { .. }
        | DomainError::LotFull { .. }
        | DomainError::LotNotEmpty { .. }
        | DomainError::AlreadyLeft { .. } => StatusCode::CONFLICT,
        DomainError::InvalidStatus { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}
