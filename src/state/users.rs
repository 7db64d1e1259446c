use anyhow::{Context, Result, bail};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use data_encoding::BASE32_NOPAD;
use futures::stream::TryStreamExt;
use mongodb::bson::{DateTime, doc, oid::ObjectId};
use rand::RngCore;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use crate::models::{RoleRecord, Session, UserRole, Usuario};

use super::{AppState, SESSION_TTL_SECONDS};

/// Usuário autenticado com o role já resolvido.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub nome: String,
    pub email: String,
    pub ativo: bool,
    pub role: UserRole,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(senha: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(senha.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("falha ao gerar hash de senha: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(senha: &str, senha_hash: &str) -> bool {
    PasswordHash::new(senha_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(senha.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub async fn find_usuario_by_email(state: &AppState, email: &str) -> Result<Option<Usuario>> {
    let usuario = state
        .usuarios
        .find_one(doc! { "email": normalize_email(email) })
        .await?;
    Ok(usuario)
}

pub async fn get_usuario_by_id(state: &AppState, id: &ObjectId) -> Result<Option<Usuario>> {
    let usuario = state.usuarios.find_one(doc! { "_id": id }).await?;
    Ok(usuario)
}

/// Role do usuário; sem registro em `user_roles`, assume `associado`.
pub async fn resolve_role(state: &AppState, user_id: &ObjectId) -> Result<UserRole> {
    let record = state
        .user_roles
        .find_one(doc! { "user_id": user_id })
        .await?;
    Ok(record.map(|r| r.role).unwrap_or_default())
}

async fn build_auth_user(state: &AppState, usuario: Usuario) -> Result<AuthUser> {
    let id = usuario.id.context("usuário sem _id")?;
    let role = resolve_role(state, &id).await?;
    Ok(AuthUser {
        id,
        nome: usuario.nome,
        email: usuario.email,
        ativo: usuario.ativo,
        role,
    })
}

/// Valida as credenciais; usuário inexistente, inativo ou senha errada
/// resultam em `None`, sem distinção para quem chama.
pub async fn authenticate(state: &AppState, email: &str, senha: &str) -> Result<Option<AuthUser>> {
    let Some(usuario) = find_usuario_by_email(state, email).await? else {
        return Ok(None);
    };
    if !usuario.ativo || !verify_password(senha, &usuario.senha_hash) {
        return Ok(None);
    }
    build_auth_user(state, usuario).await.map(Some)
}

pub async fn create_session(state: &AppState, user_id: &ObjectId) -> Result<String> {
    // Uma sessão por usuário
    let _ = state.sessions.delete_many(doc! { "user_id": user_id }).await;

    let mut token_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut token_bytes);
    let token = BASE32_NOPAD.encode(&token_bytes);

    let expires_at =
        DateTime::from_system_time(SystemTime::now() + Duration::from_secs(SESSION_TTL_SECONDS));

    state
        .sessions
        .insert_one(Session {
            id: None,
            token: token.clone(),
            user_id: *user_id,
            expires_at,
        })
        .await?;

    Ok(token)
}

pub async fn find_user_by_session(state: &AppState, token: &str) -> Result<Option<AuthUser>> {
    let Some(session) = state.sessions.find_one(doc! { "token": token }).await? else {
        return Ok(None);
    };
    if session.expires_at.to_system_time() <= SystemTime::now() {
        // Remove a sessão expirada, ignorando o resultado
        let _ = state.sessions.delete_one(doc! { "token": token }).await;
        return Ok(None);
    }
    let Some(usuario) = get_usuario_by_id(state, &session.user_id).await? else {
        return Ok(None);
    };
    if !usuario.ativo {
        return Ok(None);
    }
    build_auth_user(state, usuario).await.map(Some)
}

pub async fn delete_session(state: &AppState, token: &str) -> Result<()> {
    let _ = state.sessions.delete_one(doc! { "token": token }).await?;
    Ok(())
}

/// Cria o perfil; o email deve estar normalizado. Falha com email duplicado.
pub async fn create_usuario(
    state: &AppState,
    nome: &str,
    email: &str,
    senha: &str,
    ativo: bool,
) -> Result<ObjectId> {
    if find_usuario_by_email(state, email).await?.is_some() {
        bail!("email já cadastrado");
    }
    let res = state
        .usuarios
        .insert_one(Usuario {
            id: None,
            nome: nome.to_string(),
            email: normalize_email(email),
            senha_hash: hash_password(senha)?,
            ativo,
            criado_em: Some(DateTime::now()),
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("insert de usuário sem _id")
}

pub async fn assign_role(state: &AppState, user_id: &ObjectId, role: UserRole) -> Result<()> {
    state
        .user_roles
        .insert_one(RoleRecord {
            id: None,
            user_id: *user_id,
            role,
        })
        .await?;
    Ok(())
}

/// Troca o role removendo os registros existentes e inserindo o novo.
pub async fn replace_role(state: &AppState, user_id: &ObjectId, role: UserRole) -> Result<()> {
    let _ = state
        .user_roles
        .delete_many(doc! { "user_id": user_id })
        .await;
    assign_role(state, user_id, role).await
}

pub struct UsuarioComRole {
    pub usuario: Usuario,
    pub role: UserRole,
}

pub async fn list_usuarios(state: &AppState) -> Result<Vec<UsuarioComRole>> {
    let mut roles: HashMap<ObjectId, UserRole> = HashMap::new();
    let mut cursor = state.user_roles.find(doc! {}).await?;
    while let Some(record) = cursor.try_next().await? {
        roles.insert(record.user_id, record.role);
    }

    let mut cursor = state.usuarios.find(doc! {}).sort(doc! { "nome": 1 }).await?;
    let mut usuarios = Vec::new();
    while let Some(usuario) = cursor.try_next().await? {
        let role = usuario
            .id
            .as_ref()
            .and_then(|id| roles.get(id).cloned())
            .unwrap_or_default();
        usuarios.push(UsuarioComRole { usuario, role });
    }
    Ok(usuarios)
}

pub async fn update_usuario_perfil(
    state: &AppState,
    id: &ObjectId,
    nome: Option<&str>,
    ativo: Option<bool>,
) -> Result<u64> {
    let mut set = doc! {};
    if let Some(nome) = nome {
        set.insert("nome", nome);
    }
    if let Some(ativo) = ativo {
        set.insert("ativo", ativo);
    }
    if set.is_empty() {
        return Ok(state
            .usuarios
            .find_one(doc! { "_id": id })
            .await?
            .map(|_| 1)
            .unwrap_or(0));
    }
    let res = state
        .usuarios
        .update_one(doc! { "_id": id }, doc! { "$set": set })
        .await?;
    Ok(res.matched_count)
}

/// Remove o usuário, seus registros de role e sessões.
pub async fn delete_usuario(state: &AppState, id: &ObjectId) -> Result<u64> {
    let res = state.usuarios.delete_one(doc! { "_id": id }).await?;
    let _ = state.user_roles.delete_many(doc! { "user_id": id }).await;
    let _ = state.sessions.delete_many(doc! { "user_id": id }).await;
    Ok(res.deleted_count)
}
