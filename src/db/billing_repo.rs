// src/db/billing_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{ClientRevenueEntry, LeadPurchase, LeadUsage, Plan, PurchaseStatus},
    models::lead::Lead,
};

const PURCHASE_COLUMNS: &str = "id, client_id, quantity, amount, status, created_at";
const USAGE_COLUMNS: &str = "id, client_id, date, total_consumed";
const PLAN_COLUMNS: &str = "id, name, description, daily_limit, extra_lead_price";

// Linha crua da agregação por status (status -> contagem e soma)
#[derive(Debug, sqlx::FromRow)]
pub struct PurchaseStatusRow {
    pub status: String,
    pub count: i64,
    pub total: Decimal,
}

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_client(&self, client_id: Uuid) -> Result<Option<Lead>, AppError> {
        let maybe_client = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, name, email, phone, status, source, notes,
                   assigned_to_id, plan_id, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_client)
    }

    pub async fn find_plan_for_client(&self, client_id: Uuid) -> Result<Option<Plan>, AppError> {
        let maybe_plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT p.id, p.name, p.description, p.daily_limit, p.extra_lead_price
            FROM plans p
            INNER JOIN clients c ON c.plan_id = p.id
            WHERE c.id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_plan)
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, AppError> {
        let plans = sqlx::query_as::<_, Plan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans ORDER BY daily_limit ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    // Criação preguiçosa do registro de uso do dia. A constraint UNIQUE
    // (client_id, date) + ON CONFLICT resolve a corrida de dois primeiros
    // acessos simultâneos: uma única linha sobrevive e é retornada.
    pub async fn get_or_create_usage(
        &self,
        client_id: Uuid,
        date: NaiveDate,
    ) -> Result<LeadUsage, AppError> {
        let usage = sqlx::query_as::<_, LeadUsage>(&format!(
            r#"
            INSERT INTO lead_usages (client_id, date, total_consumed)
            VALUES ($1, $2, 0)
            ON CONFLICT (client_id, date)
                DO UPDATE SET total_consumed = lead_usages.total_consumed
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(usage)
    }

    // Soma de leads extras comprados e já aprovados
    pub async fn sum_approved_quantity(&self, client_id: Uuid) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0)
            FROM lead_purchases
            WHERE client_id = $1 AND status = $2
            "#,
        )
        .bind(client_id)
        .bind(PurchaseStatus::Aprovado.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // Consumo histórico total do cliente (todas as datas)
    pub async fn sum_lifetime_consumed(&self, client_id: Uuid) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_consumed), 0) FROM lead_usages WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn create_purchase(
        &self,
        client_id: Uuid,
        quantity: i32,
        amount: Decimal,
    ) -> Result<LeadPurchase, AppError> {
        let purchase = sqlx::query_as::<_, LeadPurchase>(&format!(
            r#"
            INSERT INTO lead_purchases (client_id, quantity, amount, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(quantity)
        .bind(amount)
        .bind(PurchaseStatus::Pendente.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(purchase)
    }

    pub async fn set_purchase_status(
        &self,
        purchase_id: Uuid,
        status: PurchaseStatus,
    ) -> Result<Option<LeadPurchase>, AppError> {
        let maybe_purchase = sqlx::query_as::<_, LeadPurchase>(&format!(
            r#"
            UPDATE lead_purchases
            SET status = $2
            WHERE id = $1
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(purchase_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_purchase)
    }

    // --- Agregações do relatório financeiro ---
    // Todos os filtros de período comparam created_at::date de forma
    // inclusiva nas duas pontas.

    pub async fn approved_revenue(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM lead_purchases
            WHERE created_at::date >= $1 AND created_at::date <= $2
              AND status = $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(PurchaseStatus::Aprovado.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn approved_leads_sold(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0)
            FROM lead_purchases
            WHERE created_at::date >= $1 AND created_at::date <= $2
              AND status = $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(PurchaseStatus::Aprovado.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn purchases_by_status(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PurchaseStatusRow>, AppError> {
        let rows = sqlx::query_as::<_, PurchaseStatusRow>(
            r#"
            SELECT status,
                   COUNT(id) AS count,
                   COALESCE(SUM(amount), 0) AS total
            FROM lead_purchases
            WHERE created_at::date >= $1 AND created_at::date <= $2
            GROUP BY status
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn revenue_by_client(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ClientRevenueEntry>, AppError> {
        let rows = sqlx::query_as::<_, ClientRevenueEntry>(
            r#"
            SELECT c.id AS client_id,
                   c.name AS client_name,
                   COALESCE(SUM(p.amount), 0) AS revenue,
                   COALESCE(SUM(p.quantity), 0) AS leads_purchased
            FROM clients c
            INNER JOIN lead_purchases p ON p.client_id = c.id
            WHERE p.created_at::date >= $1 AND p.created_at::date <= $2
              AND p.status = $3
            GROUP BY c.id, c.name
            ORDER BY revenue DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(PurchaseStatus::Aprovado.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
