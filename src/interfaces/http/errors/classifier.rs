//! Error classification
//!
//! Maps any [`AppError`] onto the HTTP status and message the client sees.
//! Rules are checked from the most specific signal (error kind) down to raw
//! backend codes; the first match wins.

use axum::http::StatusCode;

use super::AppError;
use crate::domain::{
    DomainError, CONNECTION_REFUSED, HOST_NOT_FOUND, INVALID_TEXT_REPRESENTATION, RECORD_NOT_FOUND,
};

// SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const NOT_NULL_VIOLATION: &str = "23502";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const SYNTAX_ERROR: &str = "42601";
const UNDEFINED_TABLE: &str = "42P01";
const UNDEFINED_COLUMN: &str = "42703";

const INVALID_INPUT_SYNTAX: &str = "invalid input syntax";

/// Outcome of classifying an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    BackendUnavailable,
    DuplicateValue { field: String },
    MissingValue { column: String },
    DanglingReference,
    ConstraintViolation,
    InvalidQuery,
    MissingSchemaObject,
    InvalidDataFormat,
    InvalidId,
    Validation { message: String },
    NotFound,
    Unclassified { status: StatusCode, message: String },
}

impl ErrorClass {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::DuplicateValue { .. }
            | Self::MissingValue { .. }
            | Self::DanglingReference
            | Self::ConstraintViolation
            | Self::InvalidDataFormat
            | Self::InvalidId
            | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidQuery | Self::MissingSchemaObject => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unclassified { status, .. } => *status,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::BackendUnavailable => "database connection error".to_string(),
            Self::DuplicateValue { field } => format!("{field} already exists, must be unique"),
            Self::MissingValue { column } => format!("field '{column}' is required"),
            Self::DanglingReference => "reference to a resource that does not exist".to_string(),
            Self::ConstraintViolation => {
                "data does not satisfy validation constraints".to_string()
            }
            Self::InvalidQuery => "internal server error - invalid SQL query".to_string(),
            Self::MissingSchemaObject => {
                "internal server error - database resource not found".to_string()
            }
            Self::InvalidDataFormat => "invalid data format".to_string(),
            Self::InvalidId => "provided id is not valid".to_string(),
            Self::Validation { message } => message.clone(),
            Self::NotFound => "resource not found".to_string(),
            Self::Unclassified { message, .. } => message.clone(),
        }
    }
}

/// Classify an error. Pure: same error, same outcome.
pub fn classify(error: &AppError) -> ErrorClass {
    if is_not_found(error) {
        return ErrorClass::NotFound;
    }

    if let AppError::Domain(DomainError::Validation(v)) = error {
        let message = if v.is_empty() {
            error.to_string()
        } else {
            v.messages().join(", ")
        };
        return ErrorClass::Validation { message };
    }

    if error.to_string().contains(INVALID_INPUT_SYNTAX) {
        return ErrorClass::InvalidId;
    }

    if let Some(class) = error.code().and_then(|code| classify_code(code, error)) {
        return class;
    }

    let status = match error.status_hint() {
        None | Some(StatusCode::OK) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(status) => status,
    };
    ErrorClass::Unclassified {
        status,
        message: error.to_string(),
    }
}

fn is_not_found(error: &AppError) -> bool {
    matches!(error, AppError::Domain(DomainError::NotFound { .. }))
        || error.code() == Some(RECORD_NOT_FOUND)
}

fn classify_code(code: &str, error: &AppError) -> Option<ErrorClass> {
    let class = match code {
        INVALID_TEXT_REPRESENTATION => ErrorClass::InvalidDataFormat,
        UNDEFINED_TABLE | UNDEFINED_COLUMN => ErrorClass::MissingSchemaObject,
        SYNTAX_ERROR => ErrorClass::InvalidQuery,
        CHECK_VIOLATION => ErrorClass::ConstraintViolation,
        FOREIGN_KEY_VIOLATION => ErrorClass::DanglingReference,
        NOT_NULL_VIOLATION => ErrorClass::MissingValue {
            column: error
                .column()
                .unwrap_or("required field")
                .to_string(),
        },
        UNIQUE_VIOLATION => ErrorClass::DuplicateValue {
            field: error
                .detail()
                .and_then(key_field)
                .unwrap_or("field")
                .to_string(),
        },
        CONNECTION_REFUSED | HOST_NOT_FOUND => ErrorClass::BackendUnavailable,
        _ => return None,
    };
    Some(class)
}

/// `"Key (email)=(x@y.com) already exists."` -> `email`
fn key_field(detail: &str) -> Option<&str> {
    let start = detail.find("Key (")? + "Key (".len();
    let rest = &detail[start..];
    let end = rest.find(')')?;
    let field = &rest[..end];
    (!field.is_empty()).then_some(field)
}

// ── Tests ──────────────────────────────────────────────────────
