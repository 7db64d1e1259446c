// routes/admin/users.rs
// Administração de usuários do sistema. A criação atribui o role na
// sequência e desfaz o perfil caso a atribuição falhe.

use axum::{
    Json,
    extract::State,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::UserRole;
use crate::routes::parse_object_id;
use crate::session::SessionUser;
use crate::state::{
    AppState, SENHA_MIN_CHARS, assign_role, create_usuario, delete_usuario, find_usuario_by_email,
    list_usuarios, normalize_email, replace_role, update_usuario_perfil,
};

#[derive(Serialize)]
pub struct UserRow {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub role: &'static str,
    pub ativo: bool,
    pub is_self: bool,
}

pub async fn users_index(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserRow>>> {
    session_user.require_admin("manage users")?;

    let current_id = *session_user.user_id();
    let usuarios = list_usuarios(&state).await?;
    let rows = usuarios
        .into_iter()
        .map(|entry| UserRow {
            id: entry
                .usuario
                .id
                .map(|id| id.to_hex())
                .unwrap_or_default(),
            is_self: entry.usuario.id == Some(current_id),
            nome: entry.usuario.nome,
            email: entry.usuario.email,
            role: entry.role.as_str(),
            ativo: entry.usuario.ativo,
        })
        .collect();
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub role: String,
}

pub async fn users_create(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("create users")?;

    if body.email.trim().is_empty()
        || body.password.is_empty()
        || body.nome.trim().is_empty()
        || body.role.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Missing required fields: email, password, nome, role".to_string(),
        ));
    }
    if body.password.chars().count() < SENHA_MIN_CHARS {
        return Err(ApiError::Validation(format!(
            "a senha deve ter pelo menos {SENHA_MIN_CHARS} caracteres"
        )));
    }
    let role = UserRole::parse(body.role.trim())
        .ok_or_else(|| ApiError::Validation("role deve ser admin ou associado".to_string()))?;

    let email = normalize_email(&body.email);
    if find_usuario_by_email(&state, &email).await?.is_some() {
        return Err(ApiError::Validation("email já cadastrado".to_string()));
    }

    let user_id = create_usuario(&state, body.nome.trim(), &email, &body.password, true).await?;

    if assign_role(&state, &user_id, role).await.is_err() {
        // Desfaz o perfil recém-criado para não deixar usuário sem role
        let _ = delete_usuario(&state, &user_id).await;
        return Err(ApiError::Internal(anyhow::anyhow!(
            "Failed to assign role. User creation rolled back."
        )));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "user": { "id": user_id.to_hex(), "email": email },
    })))
}

#[derive(Deserialize)]
pub struct ManageUserRequest {
    pub action: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub nome: Option<String>,
    pub ativo: Option<bool>,
    pub role: Option<String>,
}

pub async fn users_manage(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ManageUserRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage users")?;

    let user_id = parse_object_id(&body.user_id)?;

    match body.action.as_str() {
        "update" => {
            let matched =
                update_usuario_perfil(&state, &user_id, body.nome.as_deref(), body.ativo).await?;
            if matched == 0 {
                return Err(ApiError::NotFound("usuário não encontrado".to_string()));
            }
            if let Some(raw) = body.role.as_deref() {
                let role = UserRole::parse(raw).ok_or_else(|| {
                    ApiError::Validation("role deve ser admin ou associado".to_string())
                })?;
                replace_role(&state, &user_id, role).await?;
            }
            Ok(Json(serde_json::json!({ "success": true })))
        }
        "delete" => {
            if session_user.user_id() == &user_id {
                return Err(ApiError::Validation(
                    "Você não pode excluir seu próprio usuário".to_string(),
                ));
            }
            let deleted = delete_usuario(&state, &user_id).await?;
            if deleted == 0 {
                return Err(ApiError::NotFound("usuário não encontrado".to_string()));
            }
            Ok(Json(serde_json::json!({ "success": true })))
        }
        _ => Err(ApiError::Validation("Invalid action".to_string())),
    }
}
