// src/handlers/billing.rs

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
    models::billing::{
        ClientIdParams, FinancialReportResponse, LeadPurchase, LeadUsageResponse, Plan,
        PurchaseLeadsPayload, ReportParams, UpdatePurchaseStatusPayload,
    },
};

// GET /api/plans
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Billing",
    responses(
        (status = 200, description = "Planos disponíveis", body = Vec<Plan>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_plans(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let plans = app_state.billing_service.list_plans().await?;

    Ok((StatusCode::OK, Json(plans)))
}

// GET /leads/usage?client_id=...
#[utoipa::path(
    get,
    path = "/leads/usage",
    tag = "Billing",
    params(("client_id" = Uuid, Query, description = "ID do cliente")),
    responses(
        (status = 200, description = "Consumo do dia e saldo de leads extras", body = LeadUsageResponse),
        (status = 404, description = "Cliente ou plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn lead_usage(
    State(app_state): State<AppState>,
    Query(params): Query<ClientIdParams>,
) -> Result<impl IntoResponse, AppError> {
    let usage = app_state.billing_service.usage(params.client_id).await?;

    Ok((StatusCode::OK, Json(usage)))
}

// POST /leads/purchase?client_id=...
#[utoipa::path(
    post,
    path = "/leads/purchase",
    tag = "Billing",
    params(("client_id" = Uuid, Query, description = "ID do cliente")),
    request_body = PurchaseLeadsPayload,
    responses(
        (status = 201, description = "Compra registrada com status pendente", body = LeadPurchase),
        (status = 404, description = "Cliente ou plano não encontrado"),
        (status = 422, description = "Quantidade inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn purchase_leads(
    State(app_state): State<AppState>,
    Query(params): Query<ClientIdParams>,
    Json(payload): Json<PurchaseLeadsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::Validation)?;

    let purchase = app_state
        .billing_service
        .purchase_leads(params.client_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(purchase)))
}

// PUT /admin/purchases/{id}/status, somente administradores
#[utoipa::path(
    put,
    path = "/admin/purchases/{id}/status",
    tag = "Billing",
    params(("id" = Uuid, Path, description = "ID da compra")),
    request_body = UpdatePurchaseStatusPayload,
    responses(
        (status = 200, description = "Status da compra atualizado", body = LeadPurchase),
        (status = 403, description = "Permissões de administrador necessárias"),
        (status = 404, description = "Compra não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_purchase_status(
    State(app_state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let purchase = app_state
        .billing_service
        .set_purchase_status(purchase_id, payload.status)
        .await?;

    tracing::info!(
        purchase_id = %purchase_id,
        status = payload.status.as_str(),
        "Status de compra atualizado"
    );

    Ok((StatusCode::OK, Json(purchase)))
}

// GET /admin/reports, somente administradores
#[utoipa::path(
    get,
    path = "/admin/reports",
    tag = "Billing",
    params(
        ("start_date" = Option<String>, Query, description = "Início do período (padrão: primeiro dia do mês anterior)"),
        ("end_date" = Option<String>, Query, description = "Fim do período (padrão: hoje)")
    ),
    responses(
        (status = 200, description = "Relatório financeiro do período", body = FinancialReportResponse),
        (status = 403, description = "Permissões de administrador necessárias")
    ),
    security(("api_jwt" = []))
)]
pub async fn financial_report(
    State(app_state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .billing_service
        .financial_report(params.start_date, params.end_date)
        .await?;

    Ok((StatusCode::OK, Json(report)))
}
