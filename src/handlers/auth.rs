// src/handlers/auth.rs

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{ChangePasswordPayload, LoginForm, TokenResponse, User},
};

const TOKEN_COOKIE: &str = "access_token";

// Monta o cookie HTTP-only com o token. Canal de conveniência para o
// frontend; o retorno JSON continua sendo o canal principal.
fn token_cookie(token: &str, ttl_minutes: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(ttl_minutes))
        .build()
}

// POST /api/auth/token
#[utoipa::path(
    post,
    path = "/api/auth/token",
    tag = "Auth",
    responses(
        (status = 200, description = "Token JWT emitido", body = TokenResponse),
        (status = 401, description = "Credenciais inválidas ou usuário inativo")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(payload): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::Validation)?;

    tracing::info!(email = %payload.username, "Tentativa de autenticação via API");

    let (token, _user) = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let jar = jar.add(token_cookie(&token, app_state.token_ttl_minutes));

    Ok((
        jar,
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

// GET /api/auth/users/me
#[utoipa::path(
    get,
    path = "/api/auth/users/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil do usuário autenticado", body = User),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// POST /api/auth/change-password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada"),
        (status = 401, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::Validation)?;

    app_state
        .auth_service
        .change_password(&user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(json!({ "message": "Senha alterada com sucesso" })))
}

// POST /api/auth/refresh-token
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Novo token JWT", body = TokenResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_token(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = app_state.auth_service.create_token(&user.email)?;
    let jar = jar.add(token_cookie(&token, app_state.token_ttl_minutes));

    Ok((
        jar,
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

// GET /api/auth/logout: remove o cookie e volta para a tela de login
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 303, description = "Redireciona para /login"))
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build((TOKEN_COOKIE, "")).path("/").build());

    // Redirect::to responde 303 See Other
    (jar, Redirect::to("/login"))
}
