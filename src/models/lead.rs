// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um lead (cliente em prospecção) do pipeline de vendas.
//
// O status é texto livre por convenção: novo, contato, qualificado,
// proposta, fechado, perdido. Não há máquina de estados rígida.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lead {
    pub id: Uuid,

    #[schema(example = "Cliente Teste")]
    pub name: String,

    #[schema(example = "cliente@example.com")]
    pub email: String,

    #[schema(example = "11999998888")]
    pub phone: Option<String>,

    #[schema(example = "novo")]
    pub status: String,

    #[schema(example = "website")]
    pub source: Option<String>,

    pub notes: Option<String>,

    // Usuário responsável (dono) do lead
    pub assigned_to_id: Option<Uuid>,

    // Plano de cota associado ao cliente
    pub plan_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Cliente Teste")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "cliente@example.com")]
    pub email: String,

    pub phone: Option<String>,
    pub source: Option<String>,

    #[serde(default = "default_status")]
    #[schema(example = "novo")]
    pub status: String,

    pub notes: Option<String>,
    pub plan_id: Option<Uuid>,
}

fn default_status() -> String {
    "novo".to_string()
}

// Patch explícito de lead: cada campo opcional é aplicado individualmente
// no repositório (nada de atualização dinâmica por reflexão).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LeadPatch {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub assigned_to_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
}

// Parâmetros de listagem: paginação + filtros
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeadListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub assigned_to_id: Option<Uuid>,
    pub status: Option<String>,
}
