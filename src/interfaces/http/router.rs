//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, ListResponse};
use super::errors::{error_envelope, route_not_found, ErrorBody};
use super::modules::health::{self, HealthState};
use super::modules::productos::{self, ProductoHandlerState};
use super::modules::request_id::{request_id_middleware, REQUEST_ID_HEADER};
use super::modules::users::{self, UserHandlerState};
use crate::config::AppConfig;
use crate::domain::{ProductoRepository, UserRepository};

/// Unified application state. Each handler extracts its own slice via
/// `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub productos: Arc<dyn ProductoRepository>,
    pub health: HealthState,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        productos: Arc<dyn ProductoRepository>,
        db: DatabaseConnection,
    ) -> Self {
        Self {
            users,
            productos,
            health: HealthState::new(db),
        }
    }
}

impl FromRef<AppState> for UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        UserHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for ProductoHandlerState {
    fn from_ref(s: &AppState) -> Self {
        ProductoHandlerState {
            productos: Arc::clone(&s.productos),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        productos::list_productos,
        productos::get_producto,
        productos::create_producto,
    ),
    components(
        schemas(
            ErrorBody,
            ApiResponse<users::UserDto>,
            ListResponse<users::UserDto>,
            ApiResponse<productos::ProductoDto>,
            ListResponse<productos::ProductoDto>,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            productos::CreateProductoRequest,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Users", description = "User CRUD over the in-memory store"),
        (name = "Productos", description = "Product catalog stored in the database"),
    ),
    info(
        title = "Catalog Service API",
        version = "0.1.0",
        description = "Users and productos CRUD with uniform JSON envelopes",
    )
)]
pub struct ApiDoc;

/// `*` in the origin list echoes the request origin, since a literal
/// wildcard cannot be combined with credentials.
fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin.trim() == "*") {
        return AllowOrigin::mirror_request();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
}

/// Create the API router with all routes and middleware
pub fn create_api_router(state: AppState, config: &AppConfig) -> Router {
    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Users
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Productos
        .route(
            "/api/productos",
            get(productos::list_productos).post(productos::create_producto),
        )
        .route("/api/productos/{id}", get(productos::get_producto))
        .method_not_allowed_fallback(route_not_found)
        .fallback(route_not_found)
        .with_state(state)
        // Middleware, innermost first
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(middleware::from_fn_with_state(
            config.mode.exposes_debug_detail(),
            error_envelope,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
