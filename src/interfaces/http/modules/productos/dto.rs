//! Producto DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{NewProducto, Producto};

pub const MISSING_PRODUCTO_FIELDS: &str = "please provide nombre, precio and descripcion";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductoDto {
    pub id: i32,
    pub nombre: String,
    pub precio: f64,
    pub descripcion: String,
    pub stock: i32,
}

impl From<Producto> for ProductoDto {
    fn from(p: Producto) -> Self {
        Self {
            id: p.id,
            nombre: p.nombre,
            precio: p.precio,
            descripcion: p.descripcion,
            stock: p.stock,
        }
    }
}

/// Create producto request. `stock` defaults to 0.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "require_producto_fields"))]
pub struct CreateProductoRequest {
    #[schema(example = "Teclado")]
    pub nombre: Option<String>,
    #[schema(example = 49.9)]
    pub precio: Option<f64>,
    #[schema(example = "Teclado mecánico")]
    pub descripcion: Option<String>,
    #[schema(example = 12)]
    pub stock: Option<i32>,
}

fn require_producto_fields(req: &CreateProductoRequest) -> Result<(), ValidationError> {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
    if blank(&req.nombre) || blank(&req.descripcion) || req.precio.is_none() {
        let mut err = ValidationError::new("required");
        err.message = Some(MISSING_PRODUCTO_FIELDS.into());
        return Err(err);
    }
    Ok(())
}

impl From<CreateProductoRequest> for NewProducto {
    fn from(req: CreateProductoRequest) -> Self {
        Self {
            nombre: req.nombre.unwrap_or_default(),
            precio: req.precio.unwrap_or_default(),
            descripcion: req.descripcion.unwrap_or_default(),
            stock: req.stock.unwrap_or(0),
        }
    }
}
