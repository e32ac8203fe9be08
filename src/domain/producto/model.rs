//! Producto domain entity

/// Catalog product, stored in the `productos` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Producto {
    pub id: i32,
    pub nombre: String,
    pub precio: f64,
    pub descripcion: String,
    pub stock: i32,
}

/// Fields for a new product. The id is assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProducto {
    pub nombre: String,
    pub precio: f64,
    pub descripcion: String,
    pub stock: i32,
}
