//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{NewUser, User, UserPatch};

pub const MISSING_USER_FIELDS: &str = "please provide name, email and age";

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            age: u.age,
            created_at: u.created_at,
        }
    }
}

/// Create user request. All three fields are required.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "require_user_fields"))]
pub struct CreateUserRequest {
    #[schema(example = "Ana Torres")]
    pub name: Option<String>,
    #[schema(example = "ana@email.com")]
    pub email: Option<String>,
    #[schema(example = 31)]
    pub age: Option<i64>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn require_user_fields(req: &CreateUserRequest) -> Result<(), ValidationError> {
    if is_blank(&req.name) || is_blank(&req.email) || req.age.is_none() {
        let mut err = ValidationError::new("required");
        err.message = Some(MISSING_USER_FIELDS.into());
        return Err(err);
    }
    Ok(())
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

/// Partial update. Unknown keys such as `id` or `createdAt` are ignored.
/// An absent key keeps the stored value; an explicit `null` clears it and
/// fails that field's rule.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub age: Option<Option<i64>>,
}

/// Present keys become `Some`, so `null` survives as `Some(None)`.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}
