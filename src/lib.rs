//! # Catalog Service
//!
//! CRUD HTTP API for two resources: `users`, kept in an in-memory store,
//! and `productos`, stored in a relational database.
//!
//! ## Architecture
//!
//! - **domain**: entities, validation rules, repository traits and errors
//! - **infrastructure**: in-memory user store, sea-orm persistence
//! - **interfaces**: axum router, handlers, error classification
//! - **server**: startup, tracing and graceful shutdown

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, RuntimeMode};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserStore};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
