// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,

    #[schema(example = "maria@autocred.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub hashed_password: String,

    #[schema(example = "Maria da Silva")]
    pub full_name: Option<String>,

    pub is_active: bool,
    pub is_superuser: bool,

    pub created_at: DateTime<Utc>,
}

// Formulário de login no padrão OAuth2 (username = e-mail)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@autocred.com")]
    pub username: String,

    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,

    #[schema(example = "bearer")]
    pub token_type: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "A nova senha deve ter no mínimo 8 caracteres."))]
    pub new_password: String,
}

// Dados para criação de usuário (área administrativa)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "joao@autocred.com")]
    pub email: String,

    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: String,

    #[schema(example = "João Pereira")]
    pub full_name: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_superuser: bool,
}

fn default_true() -> bool {
    true
}

// Patch explícito de usuário: apenas os campos presentes são aplicados.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserPatch {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub full_name: Option<String>,

    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: Option<String>,

    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (e-mail do usuário)
    pub exp: usize,  // Expiration time (quando o token expira)
    pub iat: usize,  // Issued At (quando o token foi criado)
}
