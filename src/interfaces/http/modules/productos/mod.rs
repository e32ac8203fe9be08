//! Productos module: catalog backed by the database

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
