use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::{DomainResult, NewProducto, Producto, ProductoRepository};
use crate::infrastructure::database::entities::producto;

pub struct SeaOrmProductoRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn producto_model_to_domain(model: producto::Model) -> Producto {
    Producto {
        id: model.id,
        nombre: model.nombre,
        precio: model.precio,
        descripcion: model.descripcion,
        stock: model.stock,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ProductoRepository for SeaOrmProductoRepository {
    async fn find_all(&self) -> DomainResult<Vec<Producto>> {
        let models = producto::Entity::find()
            .order_by_asc(producto::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(producto_model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Producto>> {
        let model = producto::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(producto_model_to_domain))
    }

    async fn create(&self, data: NewProducto) -> DomainResult<Producto> {
        let model = producto::ActiveModel {
            nombre: Set(data.nombre),
            precio: Set(data.precio),
            descripcion: Set(data.descripcion),
            stock: Set(data.stock),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(producto_model_to_domain(model))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};

    async fn repo() -> SeaOrmProductoRepository {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmProductoRepository::new(db)
    }

    fn teclado() -> NewProducto {
        NewProducto {
            nombre: "Teclado".into(),
            precio: 49.9,
            descripcion: "Teclado mecánico".into(),
            stock: 12,
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let repo = repo().await;
        let created = repo.create(teclado()).await.unwrap();
        assert_eq!(created.nombre, "Teclado");

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));
        assert_eq!(repo.find_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let repo = repo().await;
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn check_constraint_surfaces_as_23514() {
        let repo = repo().await;
        let err = repo
            .create(NewProducto {
                stock: -1,
                ..teclado()
            })
            .await
            .unwrap_err();
        match err {
            DomainError::Backend(b) => assert_eq!(b.code.as_deref(), Some("23514")),
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}
