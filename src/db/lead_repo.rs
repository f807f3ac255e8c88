// src/db/lead_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{CreateLeadPayload, Lead, LeadPatch},
};

const LEAD_COLUMNS: &str =
    "id, name, email, phone, status, source, notes, assigned_to_id, plan_id, created_at";

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        payload: &CreateLeadPayload,
        assigned_to_id: Uuid,
    ) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO clients (name, email, phone, status, source, notes, assigned_to_id, plan_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.status)
        .bind(&payload.source)
        .bind(&payload.notes)
        .bind(assigned_to_id)
        .bind(payload.plan_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(lead)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let maybe_lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_lead)
    }

    // Listagem paginada com filtros opcionais de responsável e status.
    pub async fn list(
        &self,
        skip: i64,
        limit: i64,
        assigned_to_id: Option<Uuid>,
        status: Option<&str>,
    ) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM clients
            WHERE ($3::uuid IS NULL OR assigned_to_id = $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY created_at DESC
            OFFSET $1 LIMIT $2
            "#
        ))
        .bind(skip)
        .bind(limit)
        .bind(assigned_to_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    // Atualização parcial explícita, campo a campo (COALESCE). Campos
    // ausentes no patch preservam o valor atual.
    pub async fn update(&self, id: Uuid, patch: &LeadPatch) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE clients SET
                name           = COALESCE($2, name),
                email          = COALESCE($3, email),
                phone          = COALESCE($4, phone),
                source         = COALESCE($5, source),
                status         = COALESCE($6, status),
                notes          = COALESCE($7, notes),
                assigned_to_id = COALESCE($8, assigned_to_id),
                plan_id        = COALESCE($9, plan_id)
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.source)
        .bind(&patch.status)
        .bind(&patch.notes)
        .bind(patch.assigned_to_id)
        .bind(patch.plan_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(lead)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
