//! User repository interface

use async_trait::async_trait;

use super::{NewUser, User, UserPatch};
use crate::domain::DomainResult;

/// Resource store for users.
///
/// Lookups by an id that is not stored return `Ok(None)`; only validation
/// and backend failures are errors.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn create(&self, data: NewUser) -> DomainResult<User>;
    async fn update(&self, id: i64, patch: UserPatch) -> DomainResult<Option<User>>;
    async fn delete(&self, id: i64) -> DomainResult<Option<User>>;
}
