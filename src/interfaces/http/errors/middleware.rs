//! Error envelope middleware and the unmatched-route fallback

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use super::{AppError, ErrorReport};

/// Runs after every handler. Logs each error response once and, when
/// `expose_debug` is set, rewrites the body to include debug detail.
pub async fn error_envelope(
    State(expose_debug): State<bool>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let Some(report) = response.extensions().get::<Arc<ErrorReport>>().cloned() else {
        return response;
    };

    let status = report.class.status();
    if status.is_server_error() {
        error!(
            %method,
            path = %path,
            status = status.as_u16(),
            code = report.debug.code.as_deref().unwrap_or("-"),
            cause = %report.debug.stack,
            "Request failed"
        );
    } else {
        warn!(%method, path = %path, status = status.as_u16(), error = %report.class.message(), "Request rejected");
    }

    if !expose_debug {
        return response;
    }

    let body = match serde_json::to_vec(&report.body(true)) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to serialize debug error body: {}", e);
            return response;
        }
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}

/// Fallback for requests that match no route.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    AppError::not_found(format!("route not found - {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::domain::BackendError;

    async fn failing() -> Result<&'static str, AppError> {
        Err(BackendError::new("relation \"ghost\" does not exist")
            .with_code("42P01")
            .into())
    }

    fn app(expose_debug: bool) -> Router {
        Router::new()
            .route("/fail", get(failing))
            .route("/ok", get(|| async { "fine" }))
            .fallback(route_not_found)
            .layer(axum::middleware::from_fn_with_state(
                expose_debug,
                error_envelope,
            ))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn production_body_hides_debug_fields() {
        let (status, json) = call(app(false), "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "internal server error - database resource not found");
        assert!(json.get("stack").is_none());
        assert!(json.get("code").is_none());
    }

    #[tokio::test]
    async fn development_body_exposes_debug_fields() {
        let (status, json) = call(app(true), "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "42P01");
        assert!(json["stack"].as_str().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn unmatched_route_reports_its_path() {
        let (status, json) = call(app(false), "/api/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "route not found - /api/ghost");
    }

    #[tokio::test]
    async fn success_responses_untouched() {
        let response = app(true)
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
