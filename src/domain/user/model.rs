//! User domain entity

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::domain::error::{FieldError, ValidationError};

pub const NAME_TOO_SHORT: &str = "name must be at least 2 characters";
pub const EMAIL_INVALID: &str = "invalid email";
pub const AGE_OUT_OF_RANGE: &str = "age must be between 0 and 120";
pub const EMAIL_TAKEN: &str = "email is already registered";

/// Stored user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied on create. Absent fields fail validation.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

/// Partial update. `None` keeps the stored value; `Some(None)` is an
/// explicit null that clears the field, so the merged record fails that
/// field's rule.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub age: Option<Option<i64>>,
}

/// A not-yet-stored user whose fields still have to pass the rule set.
#[derive(Debug, Clone, Validate)]
pub struct UserDraft {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(
        required(message = "age must be between 0 and 120"),
        range(min = 0, max = 120, message = "age must be between 0 and 120")
    )]
    pub age: Option<i64>,
}

/// Order in which violations are reported.
const FIELD_ORDER: [&str; 3] = ["name", "email", "age"];

impl UserDraft {
    pub fn from_new(data: NewUser) -> Self {
        Self {
            name: data.name.unwrap_or_default(),
            email: data.email.unwrap_or_default(),
            age: data.age,
        }
    }

    /// Merge `patch` over an existing record.
    pub fn merged(existing: &User, patch: UserPatch) -> Self {
        Self {
            name: match patch.name {
                None => existing.name.clone(),
                Some(name) => name.unwrap_or_default(),
            },
            email: match patch.email {
                None => existing.email.clone(),
                Some(email) => email.unwrap_or_default(),
            },
            age: patch.age.unwrap_or(Some(existing.age)),
        }
    }

    /// Run every field rule and collect all violations.
    pub fn check(&self) -> Result<(), ValidationError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let by_field = errors.field_errors();
        let collected = FIELD_ORDER
            .iter()
            .filter_map(|field| by_field.get(*field).map(|errs| (*field, errs)))
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field, message)
                })
            })
            // `required` and `range` share a message; report it once
            .fold(Vec::<FieldError>::new(), |mut acc, err| {
                if !acc.contains(&err) {
                    acc.push(err);
                }
                acc
            });

        Err(ValidationError::new(collected))
    }

    /// Turn a checked draft into a stored record.
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age.unwrap_or_default(),
            created_at,
        }
    }
}

fn rule_violation(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut err = validator::ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(rule_violation("name_length", NAME_TOO_SHORT));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), validator::ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(rule_violation("email_format", EMAIL_INVALID))
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, non-empty local part,
/// and a domain with a dot that is neither its first nor its last character.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, email: &str, age: Option<i64>) -> UserDraft {
        UserDraft {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft("Ana", "ana@example.com", Some(30)).check().is_ok());
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert!(draft("Ana", "ana@example.com", Some(0)).check().is_ok());
        assert!(draft("Ana", "ana@example.com", Some(120)).check().is_ok());
        assert!(draft("Ana", "ana@example.com", Some(121)).check().is_err());
        assert!(draft("Ana", "ana@example.com", Some(-1)).check().is_err());
    }

    #[test]
    fn name_is_trimmed_before_length_check() {
        let err = draft("  a  ", "ana@example.com", Some(30))
            .check()
            .unwrap_err();
        assert_eq!(err.messages(), vec![NAME_TOO_SHORT.to_string()]);
    }

    #[test]
    fn all_violations_reported_in_field_order() {
        let err = draft("", "nope", None).check().unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                NAME_TOO_SHORT.to_string(),
                EMAIL_INVALID.to_string(),
                AGE_OUT_OF_RANGE.to_string(),
            ]
        );
    }

    #[test]
    fn missing_fields_fail_validation() {
        let err = UserDraft::from_new(NewUser::default()).check().unwrap_err();
        assert!(err.touches("name"));
        assert!(err.touches("email"));
        assert!(err.touches("age"));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn merge_keeps_unpatched_fields() {
        let existing = User {
            id: 7,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            age: 30,
            created_at: Utc::now(),
        };
        let merged = UserDraft::merged(
            &existing,
            UserPatch {
                age: Some(Some(31)),
                ..UserPatch::default()
            },
        );
        assert_eq!(merged.name, "Ana");
        assert_eq!(merged.email, "ana@example.com");
        assert_eq!(merged.age, Some(31));
    }

    #[test]
    fn explicit_nulls_fail_their_rules() {
        let existing = User {
            id: 7,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            age: 30,
            created_at: Utc::now(),
        };
        let err = UserDraft::merged(
            &existing,
            UserPatch {
                name: Some(None),
                email: None,
                age: Some(None),
            },
        )
        .check()
        .unwrap_err();
        assert_eq!(
            err.messages(),
            vec![NAME_TOO_SHORT.to_string(), AGE_OUT_OF_RANGE.to_string()]
        );
    }
}
