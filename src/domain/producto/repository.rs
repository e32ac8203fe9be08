//! Producto repository interface

use async_trait::async_trait;

use super::{NewProducto, Producto};
use crate::domain::DomainResult;

#[async_trait]
pub trait ProductoRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Producto>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Producto>>;
    async fn create(&self, data: NewProducto) -> DomainResult<Producto>;
}
