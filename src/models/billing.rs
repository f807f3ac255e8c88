// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Ciclo de vida de uma compra de leads extras. Diferente do status de lead
// (texto livre), aqui o conjunto é fechado: a aprovação é uma ação
// administrativa explícita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pendente,
    Aprovado,
    Rejeitado,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pendente => "pendente",
            PurchaseStatus::Aprovado => "aprovado",
            PurchaseStatus::Rejeitado => "rejeitado",
        }
    }
}

// --- REGISTROS DO BANCO ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Plan {
    pub id: Uuid,

    #[schema(example = "Básico")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = 10)]
    pub daily_limit: i32,

    #[schema(example = "10.00")]
    pub extra_lead_price: Decimal,
}

// Uma linha por (cliente, dia), criada preguiçosamente no primeiro acesso.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeadUsage {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-08-24")]
    pub date: NaiveDate,

    pub total_consumed: i32,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeadPurchase {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(example = 10)]
    pub quantity: i32,

    #[schema(example = "100.00")]
    pub amount: Decimal,

    #[schema(example = "pendente")]
    pub status: String,

    pub created_at: DateTime<Utc>,
}

// --- PAYLOADS E RESPOSTAS DA API ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PurchaseLeadsPayload {
    // Quantidade de leads a comprar; precisa ser positiva.
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 10)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurchaseStatusPayload {
    pub status: PurchaseStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientIdParams {
    pub client_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReportParams {
    #[schema(value_type = Option<String>, format = Date, example = "2026-07-01")]
    pub start_date: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date, example = "2026-08-24")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadUsageResponse {
    #[schema(value_type = String, format = Date, example = "2026-08-24")]
    pub date: NaiveDate,

    pub total_consumed: i32,
    pub daily_limit: i32,
    pub extra_leads_available: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StatusBreakdown {
    pub count: i64,

    #[schema(example = "350.00")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClientRevenueEntry {
    pub client_id: Uuid,

    #[schema(example = "Cliente Teste")]
    pub client_name: String,

    #[schema(example = "500.00")]
    pub revenue: Decimal,

    pub leads_purchased: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialReportResponse {
    #[schema(example = "850.00")]
    pub total_revenue: Decimal,

    pub total_leads_sold: i64,

    // status -> {count, total}
    pub purchases_by_status: std::collections::HashMap<String, StatusBreakdown>,

    // Ordenado por receita decrescente
    pub revenue_by_client: Vec<ClientRevenueEntry>,
}
