// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

// Gera o hash bcrypt fora do runtime assíncrono (operação cara por design
// do algoritmo).
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

    Ok(hashed)
}

fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed)?)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_minutes: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl_minutes,
        }
    }

    // Autentica por e-mail/senha e emite o token assinado. Credenciais
    // erradas e usuário inativo falham do mesmo jeito: erro 401, sem token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Email ou senha incorretos".into()))?;

        let password_clone = password.to_owned();
        let hashed_clone = user.hashed_password.clone();

        // Executa a verificação em um thread separado
        let is_valid = tokio::task::spawn_blocking(move || {
            verify_password(&password_clone, &hashed_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_valid {
            tracing::warn!(email, "Falha na autenticação");
            return Err(AppError::Authentication("Email ou senha incorretos".into()));
        }

        if !user.is_active {
            tracing::warn!(email, "Tentativa de login com usuário inativo");
            return Err(AppError::Authentication("Usuário inativo".into()));
        }

        let token = self.create_token(&user.email)?;
        tracing::info!(user_id = %user.id, "Login bem-sucedido");

        Ok((token, user))
    }

    // Emite um JWT com subject = e-mail e expiração configurável
    pub fn create_token(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.token_ttl_minutes);

        let claims = Claims {
            sub: email.to_owned(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Decodifica e valida assinatura/expiração. Qualquer falha vira 401.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::Authentication("Credenciais inválidas".into()))?;

        Ok(token_data.claims)
    }

    // Resolve o token para o usuário dono do subject
    pub async fn current_user(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_claims(token)?;

        self.user_repo
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Authentication("Credenciais inválidas".into()))
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let current = current_password.to_owned();
        let hashed = user.hashed_password.clone();

        let matches = tokio::task::spawn_blocking(move || verify_password(&current, &hashed))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !matches {
            tracing::warn!(user_id = %user.id, "Senha atual incorreta na troca de senha");
            return Err(AppError::Authentication("Senha atual incorreta".into()));
        }

        let new_hash = hash_password(new_password.to_owned()).await?;
        self.user_repo.update_password(user.id, &new_hash).await?;

        tracing::info!(user_id = %user.id, "Senha alterada com sucesso");
        Ok(())
    }

    // Garante o primeiro superusuário no startup (idempotente)
    pub async fn ensure_first_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            tracing::info!(email, "Usuário admin já existe.");
            return Ok(());
        }

        let hashed = hash_password(password.to_owned()).await?;
        self.user_repo
            .create(email, &hashed, Some("Administrador"), true, true)
            .await?;

        tracing::info!(email, "Usuário admin criado com sucesso!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(ttl_minutes: i64) -> AuthService {
        // Pool preguiçoso: nenhuma conexão é aberta, os testes só exercitam
        // a parte de token.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/autocred_test")
            .expect("pool lazy");

        AuthService::new(UserRepository::new(pool), "segredo-de-teste".into(), ttl_minutes)
    }

    #[tokio::test]
    async fn token_carrega_o_email_como_subject() {
        let svc = service(30);
        let token = svc.create_token("maria@autocred.com").unwrap();

        let claims = svc.decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "maria@autocred.com");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_expirado_e_rejeitado() {
        let svc = service(-5);
        let token = svc.create_token("maria@autocred.com").unwrap();

        let err = svc.decode_claims(&token).unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn token_de_outro_segredo_e_rejeitado() {
        let emissor = service(30);
        let token = emissor.create_token("maria@autocred.com").unwrap();

        let outro = {
            let pool = PgPoolOptions::new()
                .connect_lazy("postgres://localhost/autocred_test")
                .expect("pool lazy");
            AuthService::new(UserRepository::new(pool), "outro-segredo".into(), 30)
        };

        assert!(outro.decode_claims(&token).is_err());
    }

    #[test]
    fn verificacao_de_senha_contra_hash_bcrypt() {
        // Custo baixo apenas para o teste
        let hashed = bcrypt::hash("senha-correta", 4).unwrap();

        assert!(verify_password("senha-correta", &hashed).unwrap());
        assert!(!verify_password("senha-errada", &hashed).unwrap());
    }
}
