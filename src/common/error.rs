// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
//
// Erros de domínio são levantados no ponto de detecção e viram uma resposta
// estruturada (status + error_code + details) num único ponto de fronteira.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Falha de autenticação: {0}")]
    Authentication(String),

    #[error("Sem permissão: {0}")]
    Authorization(String),

    #[error("{resource} não encontrado")]
    NotFound { resource: &'static str, id: String },

    #[error("Erro de validação")]
    Validation(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    Database(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::Database(_)
            | AppError::Bcrypt(_)
            | AppError::Jwt(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "authentication_failed",
            AppError::Authorization(_) => "authorization_failed",
            AppError::NotFound { .. } => "resource_not_found",
            AppError::Validation(_) => "validation_error",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::Database(_) => "database_error",
            AppError::Bcrypt(_) | AppError::Jwt(_) | AppError::Internal(_) => "internal_error",
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::NotFound { resource, id } => json!({
                "resource_type": resource,
                "resource_id": id,
            }),
            AppError::Validation(errors) => {
                let mut field_errors = std::collections::HashMap::new();
                for (field, errs) in errors.field_errors() {
                    let messages: Vec<String> = errs
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    field_errors.insert(field.to_string(), messages);
                }
                json!({ "field_errors": field_errors })
            }
            _ => json!({}),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Authentication(msg) => msg.clone(),
            AppError::Authorization(msg) => msg.clone(),
            AppError::NotFound { resource, .. } => format!("{} não encontrado", resource),
            AppError::Validation(_) => "Erro de validação dos dados fornecidos".to_string(),
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::Database(_) => "Erro de banco de dados".to_string(),
            // Erros inesperados respondem sem vazar internals.
            _ => "Ocorreu um erro inesperado.".to_string(),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Erro interno do servidor");
        }

        let body = Json(json!({
            "error": true,
            "message": message,
            "error_code": self.error_code(),
            "details": self.details(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_seguem_a_taxonomia() {
        assert_eq!(
            AppError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Authorization("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("Lead", uuid::Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::EmailAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_carrega_detalhes_do_recurso() {
        let err = AppError::not_found("Cliente", "abc");
        assert_eq!(err.details()["resource_type"], "Cliente");
        assert_eq!(err.details()["resource_id"], "abc");
        assert_eq!(err.error_code(), "resource_not_found");
    }
}
