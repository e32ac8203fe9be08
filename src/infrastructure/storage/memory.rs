//! In-memory user store

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::user::model::EMAIL_TAKEN;
use crate::domain::user::UserDraft;
use crate::domain::{
    DomainResult, NewUser, User, UserPatch, UserRepository, ValidationError,
};

/// Rows plus the id counter, guarded together so check-then-write is atomic.
struct UserTable {
    rows: Vec<User>,
    next_id: i64,
}

impl UserTable {
    fn position(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|u| u.id == id)
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Users kept in process memory, in insertion order.
///
/// Ids come from a counter that is never reset, so a deleted id is never
/// issued again.
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

/// Shared, reference-counted user store
pub type SharedUserStore = Arc<InMemoryUserStore>;

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared() -> SharedUserStore {
        Arc::new(Self::new())
    }

    /// Insert the demo users. They go through `create`, so they take ids 1..=3.
    pub async fn seed_demo_data(&self) -> DomainResult<()> {
        let demo = [
            ("Juan Pérez", "juan@email.com", 25),
            ("María García", "maria@email.com", 30),
            ("Carlos López", "carlos@email.com", 28),
        ];
        for (name, email, age) in demo {
            self.create(NewUser {
                name: Some(name.to_string()),
                email: Some(email.to_string()),
                age: Some(age),
            })
            .await?;
        }
        info!(count = demo.len(), "Seeded demo users");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, data: NewUser) -> DomainResult<User> {
        let draft = UserDraft::from_new(data);
        draft.check()?;

        let mut table = self.table.write().await;
        if table.email_taken(&draft.email, None) {
            return Err(ValidationError::single("email", EMAIL_TAKEN).into());
        }

        let id = table.next_id;
        table.next_id += 1;
        let user = draft.into_user(id, Utc::now());
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> DomainResult<Option<User>> {
        let mut table = self.table.write().await;
        let Some(index) = table.position(id) else {
            return Ok(None);
        };

        let existing = &table.rows[index];
        let created_at = existing.created_at;
        let draft = UserDraft::merged(existing, patch);
        draft.check()?;

        if table.email_taken(&draft.email, Some(id)) {
            return Err(ValidationError::single("email", EMAIL_TAKEN).into());
        }

        let updated = draft.into_user(id, created_at);
        table.rows[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> DomainResult<Option<User>> {
        let mut table = self.table.write().await;
        let Some(index) = table.position(id) else {
            return Ok(None);
        };
        let removed = table.rows.remove(index);
        Ok(Some(removed))
    }
}

// ── Tests ──────────────────────────────────────────────────────
