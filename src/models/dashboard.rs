// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// --- LINHAS CRUAS DAS AGREGAÇÕES ---

// Contagem de leads agrupada por (ano, mês)
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyLeadCount {
    pub year: i32,
    pub month: i32,
    pub count: i64,
}

// Soma de comissões aprovadas agrupada por (ano, mês)
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyCommissionSum {
    pub year: i32,
    pub month: i32,
    pub total: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct SourceCount {
    pub source: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct StatusCount {
    pub status: Option<String>,
    pub count: i64,
}

// --- PAYLOAD DO DASHBOARD ---

// Um dataset no formato esperado pelos gráficos do frontend (Chart.js).
// As chaves internas dos gráficos são camelCase; o restante da resposta
// segue snake_case.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<serde_json::Value>,

    // Uma cor única (linha) ou uma lista de cores (pizza/doughnut)
    pub background_color: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_leads: i64,
    pub qualified_leads: i64,

    #[schema(example = 62.9)]
    pub qualified_rate: f64,

    pub converted_leads: i64,

    #[schema(example = 33.8)]
    pub conversion_rate: f64,

    // Valores monetários já formatados no padrão brasileiro ("126.000,00")
    #[schema(example = "126.000,00")]
    pub estimated_revenue: String,

    #[schema(example = "3.000,00")]
    pub average_ticket: String,

    pub leads_evolution_data: ChartData,
    pub conversion_by_source_data: ChartData,
    pub lead_status_data: ChartData,
    pub commissions_evolution_data: ChartData,
}
