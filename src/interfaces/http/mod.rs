//! HTTP REST API interfaces
//!
//! - `common`: response envelopes and JSON extractors
//! - `errors`: `AppError`, the error classifier and envelope middleware
//! - `modules`: handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod errors;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
