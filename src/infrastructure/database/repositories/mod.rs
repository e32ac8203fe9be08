//! Database repository implementations

pub mod producto_repository;

pub use producto_repository::SeaOrmProductoRepository;
