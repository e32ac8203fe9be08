//! Create productos table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Productos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Productos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Productos::Nombre).string().not_null())
                    .col(
                        ColumnDef::new(Productos::Precio)
                            .double()
                            .not_null()
                            .check(Expr::col(Productos::Precio).gte(0)),
                    )
                    .col(ColumnDef::new(Productos::Descripcion).text().not_null())
                    .col(
                        ColumnDef::new(Productos::Stock)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Productos::Stock).gte(0)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Productos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Productos {
    Table,
    Id,
    Nombre,
    Precio,
    Descripcion,
    Stock,
}
