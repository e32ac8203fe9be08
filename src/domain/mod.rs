//! Domain layer: entities, validation rules and repository interfaces.

pub mod error;
pub mod producto;
pub mod user;

pub use error::{
    BackendError, DomainError, DomainResult, FieldError, ValidationError, CONNECTION_REFUSED,
    HOST_NOT_FOUND, INVALID_TEXT_REPRESENTATION, RECORD_NOT_FOUND,
};
pub use producto::{NewProducto, Producto, ProductoRepository};
pub use user::{NewUser, User, UserPatch, UserRepository};
