//! JSON extractors for Axum
//!
//! `JsonBody<T>` works like `axum::Json<T>` but reports malformed bodies as
//! an [`AppError`], so they reach the client in the standard error envelope.
//! `ValidatedJson<T>` additionally runs `validator::Validate::validate()` and
//! turns failures into a validation error (400). `PatchBody<T>` treats an
//! empty body as `T::default()`.

use axum::body::{Body, Bytes};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::domain::{DomainError, FieldError, ValidationError};
use crate::interfaces::http::errors::AppError;

/// Field name validator uses for struct-level (`schema`) rules.
const SCHEMA_FIELD: &str = "__all__";

/// Deserialize a JSON body, mapping rejections to `AppError`.
pub struct JsonBody<T>(pub T);

/// An extractor that deserializes JSON and validates it.
///
/// # Usage
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateThing {
///     #[validate(length(min = 1, max = 50))]
///     name: String,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateThing>) {
///     // `body` is guaranteed to pass validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Like `JsonBody<T>`, but an empty or all-whitespace body yields
/// `T::default()` instead of a rejection.
pub struct PatchBody<T>(pub T);

/// Syntax and type errors become 400. Other rejections keep their status
/// (413 over the body limit, 415 without a JSON content type).
fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            AppError::bad_request(format!("invalid JSON: {}", rejection.body_text()))
        }
        other => AppError::http(other.status(), other.body_text()),
    }
}

/// Flatten validator output into a domain validation error.
///
/// Struct-level messages come first, then field messages ordered by field
/// name so the joined message is stable.
pub fn to_validation_error(errors: &ValidationErrors) -> ValidationError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| {
        let name = field.to_string();
        (name != SCHEMA_FIELD, name)
    });

    let collected = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: {}", field, e.code));
                FieldError::new(field, message)
            })
        })
        .collect();

    ValidationError::new(collected)
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(JsonBody(value))
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|e| AppError::from(DomainError::from(to_validation_error(&e))))?;

        Ok(ValidatedJson(value))
    }
}

impl<S, T> FromRequest<S> for PatchBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = Bytes::from_request(Request::from_parts(parts.clone(), body), state)
            .await
            .map_err(|rejection| AppError::http(rejection.status(), rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(PatchBody(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        Ok(PatchBody(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::DefaultBodyLimit;
    use axum::http::StatusCode;
    use axum::routing::{post, put};
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 1, max = 10, message = "name length"))]
        name: String,
        #[validate(range(min = 1, max = 100, message = "age range"))]
        age: u32,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<TestBody>) -> &'static str {
        "ok"
    }

    #[derive(Debug, Default, Deserialize)]
    struct Patch {
        name: Option<String>,
    }

    async fn patch_handler(PatchBody(patch): PatchBody<Patch>) -> String {
        patch.name.unwrap_or_else(|| "unchanged".to_string())
    }

    fn app() -> Router {
        Router::new()
            .route("/test", post(handler))
            .route("/patch", put(patch_handler))
            .layer(DefaultBodyLimit::max(64))
    }

    async fn send(req: Request) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    async fn text(resp: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn patch_request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("PUT").uri("/patch");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn json_request(body: Body) -> Request {
        Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_returns_ok() {
        let body = serde_json::json!({"name": "Alice", "age": 30});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let resp = send(json_request(Body::from("not json"))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("invalid JSON"));
    }

    #[tokio::test]
    async fn validation_failure_returns_400_with_all_messages() {
        let body = serde_json::json!({"name": "", "age": 0});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "age range, name length");
    }

    #[tokio::test]
    async fn wrong_field_type_returns_400() {
        let body = serde_json::json!({"name": "Alice", "age": "thirty"});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_returns_415() {
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .body(Body::from(r#"{"name":"Alice","age":30}"#))
            .unwrap();
        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn oversized_body_returns_413() {
        let name = "x".repeat(200);
        let body = serde_json::json!({"name": name, "age": 30});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn empty_patch_body_is_default() {
        let resp = send(patch_request(None, "")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "unchanged");

        let resp = send(patch_request(Some("application/json"), "  \n")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "unchanged");
    }

    #[tokio::test]
    async fn non_empty_patch_body_is_parsed() {
        let resp = send(patch_request(Some("application/json"), r#"{"name":"Bea"}"#)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "Bea");

        let resp = send(patch_request(None, r#"{"name":"Bea"}"#)).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let resp = send(patch_request(Some("application/json"), "{oops")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
