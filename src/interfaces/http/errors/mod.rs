//! HTTP error handling
//!
//! Handlers return `Result<_, AppError>` and never pick an error status
//! themselves unless the status is the whole point (`AppError::Http`).
//! [`classifier::classify`] decides the rest; [`middleware`] finishes the
//! envelope and logs.

pub mod classifier;
pub mod middleware;

use std::error::Error as _;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{BackendError, DomainError};

pub use classifier::{classify, ErrorClass};
pub use middleware::{error_envelope, route_not_found};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// An error whose status the handler already decided.
    #[error("{message}")]
    Http { status: StatusCode, message: String },
}

impl AppError {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::http(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(StatusCode::NOT_FOUND, message)
    }

    fn backend(&self) -> Option<&BackendError> {
        match self {
            Self::Domain(DomainError::Backend(b)) => Some(b),
            _ => None,
        }
    }

    /// Backend code, if the error came from persistence.
    pub fn code(&self) -> Option<&str> {
        self.backend().and_then(|b| b.code.as_deref())
    }

    pub fn detail(&self) -> Option<&str> {
        self.backend().and_then(|b| b.detail.as_deref())
    }

    pub fn column(&self) -> Option<&str> {
        self.backend().and_then(|b| b.column.as_deref())
    }

    /// Status chosen before the error was raised, if any.
    pub fn status_hint(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Debug rendering of the error and its source chain.
    fn trace(&self) -> String {
        let mut out = format!("{self:?}");
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        Self::Domain(DomainError::Backend(err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Domain(err.into())
    }
}

/// Error envelope: `{"success": false, "error": "..."}` plus debug fields
/// outside production.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Raw error facts, only ever shown to clients outside production.
#[derive(Debug, Clone, Default)]
pub struct DebugDetail {
    pub stack: String,
    pub code: Option<String>,
    pub detail: Option<String>,
}

/// Attached to error responses so the envelope middleware can log and
/// optionally expose debug detail.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub class: ErrorClass,
    pub debug: DebugDetail,
}

impl ErrorReport {
    pub fn body(&self, expose_debug: bool) -> ErrorBody {
        let mut body = ErrorBody {
            success: false,
            error: self.class.message(),
            stack: None,
            code: None,
            detail: None,
        };
        if expose_debug {
            body.stack = Some(self.debug.stack.clone());
            body.code = self.debug.code.clone();
            body.detail = self.debug.detail.clone();
        }
        body
    }
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        Self {
            class: classify(err),
            debug: DebugDetail {
                stack: err.trace(),
                code: err.code().map(str::to_string),
                detail: err.detail().map(str::to_string),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = ErrorReport::from(&self);
        let status = report.class.status();
        let mut response = (status, Json(report.body(false))).into_response();
        response.extensions_mut().insert(Arc::new(report));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[tokio::test]
    async fn into_response_renders_plain_envelope() {
        let err = AppError::from(DomainError::from(ValidationError::single(
            "email",
            "invalid email",
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<Arc<ErrorReport>>().is_some());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "invalid email");
        assert!(json.get("stack").is_none());
    }

    #[test]
    fn debug_body_carries_backend_facts() {
        let err = AppError::from(
            BackendError::new("duplicate key")
                .with_code("23505")
                .with_detail("Key (nombre)=(x) already exists."),
        );
        let body = ErrorReport::from(&err).body(true);
        assert_eq!(body.code.as_deref(), Some("23505"));
        assert_eq!(body.detail.as_deref(), Some("Key (nombre)=(x) already exists."));
        assert!(body.stack.is_some());
        assert_eq!(body.error, "nombre already exists, must be unique");
    }
}
