// src/services/lead.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::{
        auth::User,
        lead::{CreateLeadPayload, Lead, LeadListParams, LeadPatch},
    },
};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 200;

// Dono ou administrador podem ver/alterar um lead
pub fn can_access(user: &User, lead: &Lead) -> bool {
    user.is_superuser || lead.assigned_to_id == Some(user.id)
}

// Exclusão é privilégio exclusivo de administrador, mesmo para o dono
pub fn can_delete(user: &User) -> bool {
    user.is_superuser
}

// Escopo efetivo da listagem: usuário comum SEMPRE enxerga apenas os
// próprios leads, independente do filtro pedido; admin filtra à vontade.
pub fn effective_assigned_filter(user: &User, requested: Option<Uuid>) -> Option<Uuid> {
    if user.is_superuser {
        requested
    } else {
        Some(user.id)
    }
}

pub fn page_params(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (skip, limit)
}

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    // Cria um lead atribuído ao usuário autenticado
    pub async fn create(&self, user: &User, payload: &CreateLeadPayload) -> Result<Lead, AppError> {
        let lead = self.repo.create(payload, user.id).await?;
        tracing::info!(lead_id = %lead.id, user_id = %user.id, "Lead criado");
        Ok(lead)
    }

    pub async fn list(&self, user: &User, params: &LeadListParams) -> Result<Vec<Lead>, AppError> {
        let (skip, limit) = page_params(params.skip, params.limit);
        let assigned_to_id = effective_assigned_filter(user, params.assigned_to_id);

        self.repo
            .list(skip, limit, assigned_to_id, params.status.as_deref())
            .await
    }

    pub async fn get(&self, user: &User, lead_id: Uuid) -> Result<Lead, AppError> {
        let lead = self
            .repo
            .find_by_id(lead_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

        if !can_access(user, &lead) {
            return Err(AppError::Authorization(
                "Sem permissão para acessar este lead".into(),
            ));
        }

        Ok(lead)
    }

    pub async fn update(
        &self,
        user: &User,
        lead_id: Uuid,
        patch: &LeadPatch,
    ) -> Result<Lead, AppError> {
        let lead = self
            .repo
            .find_by_id(lead_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

        if !can_access(user, &lead) {
            return Err(AppError::Authorization(
                "Sem permissão para atualizar este lead".into(),
            ));
        }

        self.repo.update(lead_id, patch).await
    }

    // Exclusão é restrita a administradores; devolve o registro removido
    pub async fn delete(&self, user: &User, lead_id: Uuid) -> Result<Lead, AppError> {
        let lead = self
            .repo
            .find_by_id(lead_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

        if !can_delete(user) {
            return Err(AppError::Authorization(
                "Apenas administradores podem excluir leads".into(),
            ));
        }

        self.repo.delete(lead_id).await?;
        tracing::info!(lead_id = %lead_id, user_id = %user.id, "Lead excluído");

        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(is_superuser: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@autocred.com".into(),
            hashed_password: "hash".into(),
            full_name: None,
            is_active: true,
            is_superuser,
            created_at: Utc::now(),
        }
    }

    fn lead(assigned_to_id: Option<Uuid>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: "Cliente Teste".into(),
            email: "cliente@example.com".into(),
            phone: None,
            status: "novo".into(),
            source: None,
            notes: None,
            assigned_to_id,
            plan_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn dono_e_admin_acessam_o_lead() {
        let owner = user(false);
        let admin = user(true);
        let other = user(false);
        let lead = lead(Some(owner.id));

        assert!(can_access(&owner, &lead));
        assert!(can_access(&admin, &lead));
        assert!(!can_access(&other, &lead));
    }

    #[test]
    fn lead_sem_dono_so_e_acessivel_por_admin() {
        let regular = user(false);
        let admin = user(true);
        let orphan = lead(None);

        assert!(!can_access(&regular, &orphan));
        assert!(can_access(&admin, &orphan));
    }

    #[test]
    fn somente_admin_exclui_leads() {
        let owner = user(false);
        let admin = user(true);

        // Nem o dono pode excluir sem ser administrador
        assert!(!can_delete(&owner));
        assert!(can_delete(&admin));
    }

    #[test]
    fn usuario_comum_nunca_lista_leads_de_terceiros() {
        let regular = user(false);
        let someone_else = Uuid::new_v4();

        // Mesmo pedindo o filtro de outro usuário, o escopo é o próprio
        assert_eq!(
            effective_assigned_filter(&regular, Some(someone_else)),
            Some(regular.id)
        );
        assert_eq!(effective_assigned_filter(&regular, None), Some(regular.id));
    }

    #[test]
    fn admin_lista_sem_restricao() {
        let admin = user(true);
        let someone = Uuid::new_v4();

        assert_eq!(effective_assigned_filter(&admin, Some(someone)), Some(someone));
        assert_eq!(effective_assigned_filter(&admin, None), None);
    }

    #[test]
    fn paginacao_respeita_os_limites() {
        assert_eq!(page_params(None, None), (0, 100));
        assert_eq!(page_params(Some(-3), Some(0)), (0, 1));
        assert_eq!(page_params(Some(10), Some(500)), (10, 200));
        assert_eq!(page_params(Some(0), Some(50)), (0, 50));
    }
}
