// src/handlers/dashboard.rs

use axum::{Json, extract::State};

use crate::{config::AppState, models::dashboard::DashboardStats};

// GET /api/dashboard/stats
//
// Nunca devolve erro: se as agregações falharem, o serviço entrega o
// conjunto de dados de demonstração.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cartões e gráficos do painel", body = DashboardStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard_stats(State(app_state): State<AppState>) -> Json<DashboardStats> {
    Json(app_state.dashboard_service.stats().await)
}
