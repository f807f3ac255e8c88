// src/services/user.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, User, UserPatch},
    services::auth::hash_password,
    services::lead::page_params,
};

// CRUD de usuários da área administrativa. Autorização (somente admin)
// é garantida pelo middleware das rotas.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        if self.repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed = hash_password(payload.password.clone()).await?;
        let user = self
            .repo
            .create(
                &payload.email,
                &hashed,
                payload.full_name.as_deref(),
                payload.is_active,
                payload.is_superuser,
            )
            .await?;

        tracing::info!(user_id = %user.id, "Usuário criado");
        Ok(user)
    }

    pub async fn list(&self, skip: Option<i64>, limit: Option<i64>) -> Result<Vec<User>, AppError> {
        let (skip, limit) = page_params(skip, limit);
        self.repo.list(skip, limit).await
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User, AppError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário", user_id))
    }

    pub async fn update(&self, user_id: Uuid, patch: &UserPatch) -> Result<User, AppError> {
        let existing = self.get(user_id).await?;

        // Troca de e-mail exige que o novo não esteja em uso por outro
        if let Some(new_email) = &patch.email {
            if new_email != &existing.email
                && self.repo.find_by_email(new_email).await?.is_some()
            {
                return Err(AppError::EmailAlreadyExists);
            }
        }

        // Senha nova chega em texto plano e sai como hash
        let hashed = match &patch.password {
            Some(password) => Some(hash_password(password.clone()).await?),
            None => None,
        };

        self.repo
            .update(
                user_id,
                patch.email.as_deref(),
                patch.full_name.as_deref(),
                hashed.as_deref(),
                patch.is_active,
                patch.is_superuser,
            )
            .await
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<User, AppError> {
        let user = self.get(user_id).await?;
        self.repo.delete(user_id).await?;

        tracing::info!(user_id = %user_id, "Usuário excluído");
        Ok(user)
    }
}
