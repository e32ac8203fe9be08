//! Producto aggregate

pub mod model;
pub mod repository;

pub use model::{NewProducto, Producto};
pub use repository::ProductoRepository;
