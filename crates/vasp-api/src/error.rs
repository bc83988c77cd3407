//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps directory, sector-form and CSV errors to HTTP status codes with a
//! JSON body of the form `{ "error": { "code", "message", "details"? } }`.
//! Internal error details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use vasp_directory::{CompanyError, CsvError, DirectoryError};
use vasp_sector::EditError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for some client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<vasp_core::ValidationError> for AppError {
    fn from(err: vasp_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Invalid(inner) => inner.into(),
            DirectoryError::SlugTaken(_) => Self::Conflict(err.to_string()),
            DirectoryError::NotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

/// Unknown sectors and fields are missing resources; the rest are edits the
/// current form state cannot accept.
impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::UnknownSector { .. } | EditError::UnknownField { .. } => {
                Self::NotFound(err.to_string())
            }
            EditError::HiddenField { .. } => Self::Conflict(err.to_string()),
            EditError::KindMismatch { .. }
            | EditError::OptionNotOffered { .. }
            | EditError::IndexOutOfRange { .. }
            | EditError::InvalidNumber { .. } => Self::Validation(err.to_string()),
        }
    }
}

impl From<CsvError> for AppError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::Csv(_) | CsvError::MissingColumn(_) | CsvError::TooManyRows { .. } => {
                Self::BadRequest(err.to_string())
            }
            CsvError::Io(_) | CsvError::Utf8(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vasp_core::{FieldKey, SectorId};

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT, "CONFLICT"),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[test]
    fn directory_errors_map_to_statuses() {
        let slug = vasp_core::CompanySlug::new("rain").unwrap();
        assert!(matches!(
            AppError::from(DirectoryError::SlugTaken(slug)),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(DirectoryError::NotFound("ghost".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(DirectoryError::Invalid(CompanyError::NoSectors)),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn edit_errors_map_to_statuses() {
        let sector = SectorId::new("custody-services").unwrap();
        let field = FieldKey::new("insurance_amount_pkr").unwrap();
        assert!(matches!(
            AppError::from(EditError::HiddenField {
                sector: sector.clone(),
                field: field.clone(),
                controller: FieldKey::new("insurance_coverage").unwrap(),
            }),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(EditError::UnknownField { sector, field: field.clone() }),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(EditError::InvalidNumber { field, input: "abc".into() }),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn internal_message_is_hidden() {
        let response = AppError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
