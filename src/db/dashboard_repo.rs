// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::billing::PurchaseStatus,
    models::dashboard::{MonthlyCommissionSum, MonthlyLeadCount, SourceCount, StatusCount},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Contagem de leads criados a partir de um instante
    pub async fn count_leads_since(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(id) FROM clients WHERE created_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn count_leads_since_with_status(
        &self,
        since: DateTime<Utc>,
        statuses: &[&str],
    ) -> Result<i64, AppError> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(id) FROM clients WHERE created_at >= $1 AND status = ANY($2)",
        )
        .bind(since)
        .bind(&statuses)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // Evolução mensal de leads (últimos 12 meses)
    pub async fn leads_by_month(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyLeadCount>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyLeadCount>(
            r#"
            SELECT date_part('year', created_at)::int4 AS year,
                   date_part('month', created_at)::int4 AS month,
                   COUNT(id) AS count
            FROM clients
            WHERE created_at >= $1
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Comissões aprovadas por mês. O valor das compras de leads extras faz o
    // papel da comissão no relatório.
    pub async fn commissions_by_month(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyCommissionSum>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyCommissionSum>(
            r#"
            SELECT date_part('year', created_at)::int4 AS year,
                   date_part('month', created_at)::int4 AS month,
                   COALESCE(SUM(amount), 0) AS total
            FROM lead_purchases
            WHERE created_at >= $1 AND status = $2
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(since)
        .bind(PurchaseStatus::Aprovado.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Leads por origem, do maior para o menor volume (todos os tempos)
    pub async fn leads_by_source(&self) -> Result<Vec<SourceCount>, AppError> {
        let rows = sqlx::query_as::<_, SourceCount>(
            r#"
            SELECT source, COUNT(id) AS count
            FROM clients
            GROUP BY source
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn leads_by_status(&self) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(id) AS count
            FROM clients
            GROUP BY status
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
