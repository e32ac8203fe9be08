//! User API handlers
//!
//! CRUD over the in-memory user store. Errors are returned as `AppError`
//! and shaped by the error envelope.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, UpdateUserRequest, UserDto};
use crate::domain::user::parse_user_id;
use crate::domain::UserRepository;
use crate::interfaces::http::common::{ApiResponse, ListResponse, PatchBody, ValidatedJson};
use crate::interfaces::http::errors::{AppError, ErrorBody};

pub const USER_NOT_FOUND: &str = "user not found";

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<dyn UserRepository>,
}

fn not_found() -> AppError {
    AppError::not_found(USER_NOT_FOUND)
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users in insertion order", body = ListResponse<UserDto>)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ListResponse<UserDto>>, AppError> {
    let users = state.users.find_all().await?;
    Ok(Json(ListResponse::new(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, AppError> {
    let id = parse_user_id(&id).ok_or_else(not_found)?;
    let user = state.users.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Missing field, invalid field or duplicate email", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), AppError> {
    let user = state.users.create(request.into()).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Merged record is invalid", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    PatchBody(request): PatchBody<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, AppError> {
    let id = parse_user_id(&id).ok_or_else(not_found)?;
    let user = state
        .users
        .update(id, request.into())
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(user_id = user.id, "User updated");
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Removed user", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, AppError> {
    let id = parse_user_id(&id).ok_or_else(not_found)?;
    let user = state.users.delete(id).await?.ok_or_else(not_found)?;
    tracing::info!(user_id = user.id, "User deleted");
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
