//! Database entities module

pub mod producto;

pub use producto::Entity as Producto;
