//! Feature modules: one per resource, plus cross-cutting middleware

pub mod health;
pub mod productos;
pub mod request_id;
pub mod users;
