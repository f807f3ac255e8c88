// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

const USER_COLUMNS: &str =
    "id, email, hashed_password, full_name, is_active, is_superuser, created_at";

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_user)
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    // Cria um novo usuário, com tratamento de erro específico para
    // e-mails duplicados.
    pub async fn create(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: Option<&str>,
        is_active: bool,
        is_superuser: bool,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, hashed_password, full_name, is_active, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(hashed_password)
        .bind(full_name)
        .bind(is_active)
        .bind(is_superuser)
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

        Ok(user)
    }

    // Atualização parcial explícita: apenas os campos presentes sobrescrevem
    // os valores atuais (COALESCE). A senha já chega com hash.
    pub async fn update(
        &self,
        id: Uuid,
        email: Option<&str>,
        full_name: Option<&str>,
        hashed_password: Option<&str>,
        is_active: Option<bool>,
        is_superuser: Option<bool>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                email           = COALESCE($2, email),
                full_name       = COALESCE($3, full_name),
                hashed_password = COALESCE($4, hashed_password),
                is_active       = COALESCE($5, is_active),
                is_superuser    = COALESCE($6, is_superuser)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(hashed_password)
        .bind(is_active)
        .bind(is_superuser)
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

        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, hashed_password: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET hashed_password = $2 WHERE id = $1")
            .bind(id)
            .bind(hashed_password)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
