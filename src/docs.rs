// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::change_password,
        handlers::auth::refresh_token,
        handlers::auth::logout,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,

        // --- Billing ---
        handlers::billing::list_plans,
        handlers::billing::lead_usage,
        handlers::billing::purchase_leads,
        handlers::billing::update_purchase_status,
        handlers::billing::financial_report,

        // --- Dashboard ---
        handlers::dashboard::dashboard_stats,

        // --- Admin ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginForm,
            models::auth::TokenResponse,
            models::auth::ChangePasswordPayload,
            models::auth::CreateUserPayload,
            models::auth::UserPatch,

            // --- Leads ---
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::LeadPatch,

            // --- Billing ---
            models::billing::PurchaseStatus,
            models::billing::Plan,
            models::billing::LeadUsage,
            models::billing::LeadPurchase,
            models::billing::PurchaseLeadsPayload,
            models::billing::UpdatePurchaseStatusPayload,
            models::billing::LeadUsageResponse,
            models::billing::StatusBreakdown,
            models::billing::ClientRevenueEntry,
            models::billing::FinancialReportResponse,

            // --- Dashboard ---
            models::dashboard::Dataset,
            models::dashboard::ChartData,
            models::dashboard::DashboardStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Sessão"),
        (name = "Leads", description = "Gestão de Leads (CRM)"),
        (name = "Billing", description = "Planos, Cotas e Compras de Leads"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais"),
        (name = "Admin", description = "Administração de Usuários")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
