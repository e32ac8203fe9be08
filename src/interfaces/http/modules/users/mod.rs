//! Users module: CRUD over the in-memory store

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
