// routes/login.rs
// POST /login { "email": "...", "senha": "..." } -> { "ok": true, "user": {...} }
// POST /signup cria o perfil sem role e sem sessão.

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::session::SESSION_COOKIE_NAME;
use crate::state::{
    AppState, AuthUser, SENHA_MIN_CHARS, SESSION_TTL_SECONDS, authenticate, create_session,
    create_usuario, find_usuario_by_email, normalize_email,
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Serialize)]
pub struct UserView {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub role: &'static str,
}

impl UserView {
    pub fn from_auth(user: &AuthUser) -> Self {
        UserView {
            id: user.id.to_hex(),
            nome: user.nome.clone(),
            email: user.email.clone(),
            role: user.role.as_str(),
        }
    }
}

/// Valida email e senha antes de qualquer consulta ao banco.
fn validate_credentials(email: &str, senha: &str) -> Result<String, ApiError> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("email inválido".to_string()));
    }
    if senha.chars().count() < SENHA_MIN_CHARS {
        return Err(ApiError::Validation(format!(
            "a senha deve ter pelo menos {SENHA_MIN_CHARS} caracteres"
        )));
    }
    Ok(email)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = validate_credentials(&body.email, &body.senha)?;

    let Some(user) = authenticate(&state, &email, &body.senha).await? else {
        return Err(ApiError::Unauthorized("credenciais inválidas".to_string()));
    };

    let token = create_session(&state, &user.id).await?;

    let mut response = Json(serde_json::json!({
        "ok": true,
        "user": UserView::from_auth(&user),
    }))
    .into_response();
    if let Ok(header_value) = HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, SESSION_TTL_SECONDS
    )) {
        response.headers_mut().append(SET_COOKIE, header_value);
    }
    Ok(response)
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = validate_credentials(&body.email, &body.senha)?;
    let nome = body.nome.trim();
    if nome.is_empty() {
        return Err(ApiError::Validation("nome é obrigatório".to_string()));
    }

    if find_usuario_by_email(&state, &email).await?.is_some() {
        return Err(ApiError::Conflict("email já cadastrado".to_string()));
    }

    // Perfil ativo, sem role atribuído; o acesso de admin é concedido depois
    create_usuario(&state, nome, &email, &body.senha, true).await?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
