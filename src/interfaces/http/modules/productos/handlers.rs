//! Producto API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateProductoRequest, ProductoDto};
use crate::domain::{BackendError, ProductoRepository, INVALID_TEXT_REPRESENTATION};
use crate::interfaces::http::common::{ApiResponse, ListResponse, ValidatedJson};
use crate::interfaces::http::errors::{AppError, ErrorBody};

pub const PRODUCTO_NOT_FOUND: &str = "product not found";

#[derive(Clone)]
pub struct ProductoHandlerState {
    pub productos: Arc<dyn ProductoRepository>,
}

/// Path ids must be integers; anything else fails the way the database
/// would reject it.
fn parse_producto_id(raw: &str) -> Result<i32, AppError> {
    raw.parse().map_err(|_| {
        BackendError::new(format!(
            "invalid input syntax for type integer: \"{raw}\""
        ))
        .with_code(INVALID_TEXT_REPRESENTATION)
        .into()
    })
}

#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "All products ordered by id", body = ListResponse<ProductoDto>),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    )
)]
pub async fn list_productos(
    State(state): State<ProductoHandlerState>,
) -> Result<Json<ListResponse<ProductoDto>>, AppError> {
    let productos = state.productos.find_all().await?;
    Ok(Json(ListResponse::new(
        productos.into_iter().map(ProductoDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = String, Path, description = "Producto ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductoDto>),
        (status = 400, description = "Id is not an integer", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_producto(
    State(state): State<ProductoHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductoDto>>, AppError> {
    let id = parse_producto_id(&id)?;
    let producto = state
        .productos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(PRODUCTO_NOT_FOUND))?;
    Ok(Json(ApiResponse::success(ProductoDto::from(producto))))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = CreateProductoRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductoDto>),
        (status = 400, description = "Missing field or constraint violation", body = ErrorBody)
    )
)]
pub async fn create_producto(
    State(state): State<ProductoHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateProductoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductoDto>>), AppError> {
    let producto = state.productos.create(request.into()).await?;
    tracing::info!(producto_id = producto.id, "Producto created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProductoDto::from(producto))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::http::errors::{classify, ErrorClass};

    #[test]
    fn non_numeric_id_classifies_as_invalid_id() {
        let err = parse_producto_id("abc").unwrap_err();
        assert_eq!(err.code(), Some(INVALID_TEXT_REPRESENTATION));
        assert_eq!(classify(&err), ErrorClass::InvalidId);
    }

    #[test]
    fn numeric_id_parses() {
        assert_eq!(parse_producto_id("42").unwrap(), 42);
    }
}
