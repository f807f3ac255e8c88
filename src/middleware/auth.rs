// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{common::error::AppError, config::AppState, models::auth::User};

// Extrai o token do header Authorization ou do cookie HTTP-only usado
// pelo frontend. Um eventual prefixo "Bearer " no cookie é tolerado.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_owned());
        }
    }

    let jar = CookieJar::from_headers(headers);
    jar.get("access_token").map(|cookie| {
        let value = cookie.value();
        value.strip_prefix("Bearer ").unwrap_or(value).to_owned()
    })
}

// Clientes de navegador (que aceitam HTML) são redirecionados para a tela
// de login num 401, em vez de receberem o JSON de erro.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

// Middleware de autenticação: valida o token, exige usuário ativo e insere
// o User nos extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers()) {
        Some(token) => token,
        None => return unauthorized(request.headers()),
    };

    let user = match app_state.auth_service.current_user(&token).await {
        Ok(user) => user,
        Err(_) => return unauthorized(request.headers()),
    };

    if !user.is_active {
        return AppError::Authorization("Usuário inativo".into()).into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

// Middleware de autorização administrativa; assume o auth_guard antes.
pub async fn admin_guard(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<User>() {
        Some(user) if user.is_superuser => next.run(request).await,
        Some(_) => AppError::Authorization("Permissões de administrador necessárias".into())
            .into_response(),
        None => AppError::Authentication("Credenciais inválidas".into()).into_response(),
    }
}

fn unauthorized(headers: &HeaderMap) -> Response {
    if wants_html(headers) {
        // 302 Found, como o frontend espera
        return (StatusCode::FOUND, [(header::LOCATION, "/login")]).into_response();
    }

    AppError::Authentication("Token de autenticação inválido ou ausente".into()).into_response()
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Authentication("Credenciais inválidas".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_vem_do_header_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );

        assert_eq!(extract_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn token_vem_do_cookie_com_prefixo() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=Bearer%20abc123"),
        );

        // O CookieJar não decodifica percent-encoding; o frontend grava o
        // valor cru quando usa fetch, então aceitamos os dois formatos.
        let mut plain = HeaderMap::new();
        plain.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=abc123"),
        );

        assert_eq!(extract_token(&plain), Some("abc123".to_string()));
        assert!(extract_token(&headers).is_some());
    }

    #[test]
    fn sem_token_nao_ha_autenticacao() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn navegador_sem_token_e_redirecionado_para_o_login() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );

        let response = unauthorized(&headers);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn cliente_de_api_sem_token_recebe_401() {
        let response = unauthorized(&HeaderMap::new());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn navegador_e_detectado_pelo_accept() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(wants_html(&headers));

        let mut api = HeaderMap::new();
        api.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!wants_html(&api));
    }
}
