// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{BillingRepository, DashboardRepository, LeadRepository, UserRepository},
    services::{
        auth::AuthService, billing::BillingService, dashboard::DashboardService,
        lead::LeadService, user::UserService,
    },
};

// Estado global da aplicação: montado uma única vez no startup e imutável
// depois disso. Cada requisição recebe um clone barato (tudo é Arc por baixo).
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub billing_service: BillingService,
    pub dashboard_service: DashboardService,
    pub user_service: UserService,
    // Tempo de vida do token, usado também no Max-Age do cookie
    pub token_ttl_minutes: i64,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let token_ttl_minutes: i64 = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let billing_repo = BillingRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), token_ttl_minutes);
        let lead_service = LeadService::new(lead_repo);
        let billing_service = BillingService::new(billing_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);
        let user_service = UserService::new(user_repo);

        Ok(Self {
            db_pool,
            auth_service,
            lead_service,
            billing_service,
            dashboard_service,
            user_service,
            token_ttl_minutes,
        })
    }
}
