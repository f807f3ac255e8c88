// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{CreateUserPayload, User, UserPatch},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

// POST /api/admin/users
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado"),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::Validation)?;

    let user = app_state.user_service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(
        ("skip" = Option<i64>, Query, description = "Registros a pular (paginação)"),
        ("limit" = Option<i64>, Query, description = "Máximo de registros (teto 200)")
    ),
    responses(
        (status = 200, description = "Lista de usuários", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list(params.skip, params.limit).await?;

    Ok((StatusCode::OK, Json(users)))
}

// GET /api/admin/users/{id}
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário encontrado", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get(user_id).await?;

    Ok((StatusCode::OK, Json(user)))
}

// PUT /api/admin/users/{id}
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate().map_err(AppError::Validation)?;

    let user = app_state.user_service.update(user_id, &patch).await?;

    Ok((StatusCode::OK, Json(user)))
}

// DELETE /api/admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário removido", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.delete(user_id).await?;

    Ok((StatusCode::OK, Json(user)))
}
