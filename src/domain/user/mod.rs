//! User aggregate
//!
//! Contains the User entity, its validation rules, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{is_valid_email, NewUser, User, UserDraft, UserPatch};
pub use repository::UserRepository;

/// Parse a path id the way the store expects it: an exact integer.
pub fn parse_user_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}
