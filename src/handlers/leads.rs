// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::lead::{CreateLeadPayload, Lead, LeadListParams, LeadPatch},
};

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado, atribuído ao usuário autenticado", body = Lead),
        (status = 422, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::Validation)?;

    let lead = app_state.lead_service.create(&user, &payload).await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(
        ("skip" = Option<i64>, Query, description = "Registros a pular (paginação)"),
        ("limit" = Option<i64>, Query, description = "Máximo de registros (teto 200)"),
        ("assigned_to_id" = Option<Uuid>, Query, description = "Filtrar por responsável"),
        ("status" = Option<String>, Query, description = "Filtrar por status")
    ),
    responses(
        (status = 200, description = "Lista de leads; usuário comum só vê os próprios", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<LeadListParams>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list(&user, &params).await?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead encontrado", body = Lead),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.get(&user, lead_id).await?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = LeadPatch,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
    Json(patch): Json<LeadPatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate().map_err(AppError::Validation)?;

    let lead = app_state.lead_service.update(&user, lead_id, &patch).await?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}, somente administradores
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead removido", body = Lead),
        (status = 403, description = "Apenas administradores podem excluir leads"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.delete(&user, lead_id).await?;

    Ok((StatusCode::OK, Json(lead)))
}
