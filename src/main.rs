//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use std::env;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é aceitável aqui: se a configuração falhar, a aplicação
    // não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante o superusuário inicial (idempotente)
    let admin_email =
        env::var("FIRST_SUPERUSER_EMAIL").unwrap_or_else(|_| "admin@autocred.com".to_string());
    let admin_password =
        env::var("FIRST_SUPERUSER_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    app_state
        .auth_service
        .ensure_first_superuser(&admin_email, &admin_password)
        .await
        .expect("Falha ao garantir o superusuário inicial.");

    // Rotas públicas de autenticação
    let auth_public_routes = Router::new()
        .route("/token", post(handlers::auth::login))
        .route("/logout", get(handlers::auth::logout));

    // Rotas de sessão (exigem token válido)
    let auth_session_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route("/change-password", post(handlers::auth::change_password))
        .route("/refresh-token", post(handlers::auth::refresh_token))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let lead_routes = Router::new()
        .route(
            "/leads",
            post(handlers::leads::create_lead).get(handlers::leads::list_leads),
        )
        .route(
            "/leads/{id}",
            get(handlers::leads::get_lead)
                .put(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/plans", get(handlers::billing::list_plans))
        .route("/dashboard/stats", get(handlers::dashboard::dashboard_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Cota e compra de leads extras ficam fora do prefixo /api por
    // compatibilidade com o frontend existente.
    let billing_routes = Router::new()
        .route("/usage", get(handlers::billing::lead_usage))
        .route("/purchase", post(handlers::billing::purchase_leads))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Área administrativa: admin_guard roda depois do auth_guard, que é a
    // camada mais externa (a última adicionada executa primeiro).
    let admin_routes = Router::new()
        .route("/reports", get(handlers::billing::financial_report))
        .route(
            "/purchases/{id}/status",
            put(handlers::billing::update_purchase_status),
        )
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let admin_user_routes = Router::new()
        .route(
            "/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_public_routes)
        .nest("/api/auth", auth_session_routes)
        .nest("/api", lead_routes)
        .nest("/leads", billing_routes)
        .nest("/admin", admin_routes)
        .nest("/api/admin", admin_user_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.to_string())
    );
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
