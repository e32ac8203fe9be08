//! Domain errors

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// One violated field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Cow<'static, str>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Client-supplied data failed one or more field rules.
///
/// Every violation found is kept, in the order the rules were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Whether any violation concerns `field`
    pub fn touches(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "validation failed");
        }
        write!(f, "{}", self.messages().join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// A persistence failure, normalized away from any particular driver.
///
/// `code` carries a SQLSTATE (`23505`, `42P01`, ...) or a connection code
/// (`ECONNREFUSED`, `ENOTFOUND`) or [`RECORD_NOT_FOUND`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendError {
    pub code: Option<String>,
    pub message: String,
    pub detail: Option<String>,
    pub column: Option<String>,
}

/// Backend signal for "the addressed row does not exist".
pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";
/// The database refused or dropped the connection.
pub const CONNECTION_REFUSED: &str = "ECONNREFUSED";
/// The database host name did not resolve.
pub const HOST_NOT_FOUND: &str = "ENOTFOUND";
/// SQLSTATE for a value the column type cannot parse.
pub const INVALID_TEXT_REPRESENTATION: &str = "22P02";

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_all_violations() {
        let err = ValidationError::new(vec![
            FieldError::new("name", "name must be at least 2 characters"),
            FieldError::new("age", "age must be between 0 and 120"),
        ]);
        assert_eq!(
            err.to_string(),
            "name must be at least 2 characters, age must be between 0 and 120"
        );
        assert!(err.touches("age"));
        assert!(!err.touches("email"));
    }

    #[test]
    fn backend_error_displays_raw_message() {
        let err = BackendError::new("boom").with_code("XX000");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.code.as_deref(), Some("XX000"));
    }
}
