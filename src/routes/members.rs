// routes/members.rs
// Cadastro de associados e seus familiares. Todas as operações exigem
// perfil de administrador.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{Associado, Familiar, Parentesco, StatusAssociado};
use crate::routes::parse_object_id;
use crate::session::SessionUser;
use crate::state::{
    AppState, create_associado, create_familiar, delete_associado, delete_familiar,
    get_associado_by_id, list_associados, list_familiares, update_associado,
};

#[derive(Deserialize)]
pub struct AssociadoPayload {
    pub nome_completo: String,
    pub cpf: String,
    #[serde(default)]
    pub rg: String,
    pub data_nascimento: NaiveDate,
    pub endereco_rua: String,
    pub endereco_numero: String,
    pub endereco_complemento: Option<String>,
    pub endereco_bairro: String,
    pub endereco_cidade: String,
    pub endereco_estado: String,
    pub endereco_cep: String,
    #[serde(default)]
    pub contato_telefone: String,
    pub contato_celular: String,
    pub contato_email: String,
    pub status: Option<StatusAssociado>,
    pub data_associacao: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

impl AssociadoPayload {
    /// Campos obrigatórios do cadastro; `status` e `data_associacao`
    /// recebem os padrões `ativo` e a data de hoje.
    fn into_associado(self) -> Result<Associado, ApiError> {
        let obrigatorios = [
            ("nome_completo", &self.nome_completo),
            ("cpf", &self.cpf),
            ("endereco_rua", &self.endereco_rua),
            ("endereco_numero", &self.endereco_numero),
            ("endereco_bairro", &self.endereco_bairro),
            ("endereco_cidade", &self.endereco_cidade),
            ("endereco_estado", &self.endereco_estado),
            ("endereco_cep", &self.endereco_cep),
            ("contato_celular", &self.contato_celular),
            ("contato_email", &self.contato_email),
        ];
        for (campo, valor) in obrigatorios {
            if valor.trim().is_empty() {
                return Err(ApiError::Validation(format!("{campo} é obrigatório")));
            }
        }

        Ok(Associado {
            id: None,
            nome_completo: self.nome_completo.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
            rg: self.rg.trim().to_string(),
            data_nascimento: self.data_nascimento,
            endereco_rua: self.endereco_rua.trim().to_string(),
            endereco_numero: self.endereco_numero.trim().to_string(),
            endereco_complemento: self.endereco_complemento,
            endereco_bairro: self.endereco_bairro.trim().to_string(),
            endereco_cidade: self.endereco_cidade.trim().to_string(),
            endereco_estado: self.endereco_estado.trim().to_string(),
            endereco_cep: self.endereco_cep.trim().to_string(),
            contato_telefone: self.contato_telefone.trim().to_string(),
            contato_celular: self.contato_celular.trim().to_string(),
            contato_email: self.contato_email.trim().to_string(),
            status: self.status.unwrap_or(StatusAssociado::Ativo),
            data_associacao: self
                .data_associacao
                .unwrap_or_else(|| Local::now().date_naive()),
            observacoes: self.observacoes,
        })
    }
}

#[derive(Serialize)]
pub struct AssociadoView {
    pub id: String,
    pub nome_completo: String,
    pub cpf: String,
    pub rg: String,
    pub data_nascimento: NaiveDate,
    pub endereco_rua: String,
    pub endereco_numero: String,
    pub endereco_complemento: Option<String>,
    pub endereco_bairro: String,
    pub endereco_cidade: String,
    pub endereco_estado: String,
    pub endereco_cep: String,
    pub contato_telefone: String,
    pub contato_celular: String,
    pub contato_email: String,
    pub status: StatusAssociado,
    pub data_associacao: NaiveDate,
    pub observacoes: Option<String>,
}

impl AssociadoView {
    pub fn from_model(associado: Associado) -> Self {
        AssociadoView {
            id: associado.id.map(|id| id.to_hex()).unwrap_or_default(),
            nome_completo: associado.nome_completo,
            cpf: associado.cpf,
            rg: associado.rg,
            data_nascimento: associado.data_nascimento,
            endereco_rua: associado.endereco_rua,
            endereco_numero: associado.endereco_numero,
            endereco_complemento: associado.endereco_complemento,
            endereco_bairro: associado.endereco_bairro,
            endereco_cidade: associado.endereco_cidade,
            endereco_estado: associado.endereco_estado,
            endereco_cep: associado.endereco_cep,
            contato_telefone: associado.contato_telefone,
            contato_celular: associado.contato_celular,
            contato_email: associado.contato_email,
            status: associado.status,
            data_associacao: associado.data_associacao,
            observacoes: associado.observacoes,
        }
    }
}

#[derive(Serialize)]
pub struct FamiliarView {
    pub id: String,
    pub associado_id: String,
    pub nome: String,
    pub parentesco: Parentesco,
    pub data_nascimento: NaiveDate,
    pub cpf: Option<String>,
}

impl FamiliarView {
    fn from_model(familiar: Familiar) -> Self {
        FamiliarView {
            id: familiar.id.map(|id| id.to_hex()).unwrap_or_default(),
            associado_id: familiar.associado_id.to_hex(),
            nome: familiar.nome,
            parentesco: familiar.parentesco,
            data_nascimento: familiar.data_nascimento,
            cpf: familiar.cpf,
        }
    }
}

pub async fn associados_index(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AssociadoView>>> {
    session_user.require_admin("manage members")?;
    let associados = list_associados(&state).await?;
    Ok(Json(
        associados.into_iter().map(AssociadoView::from_model).collect(),
    ))
}

pub async fn associados_show(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssociadoView>> {
    session_user.require_admin("manage members")?;
    let object_id = parse_object_id(&id)?;
    let associado = get_associado_by_id(&state, &object_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("associado não encontrado".to_string()))?;
    Ok(Json(AssociadoView::from_model(associado)))
}

pub async fn associados_create(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssociadoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage members")?;
    let associado = payload.into_associado()?;
    let id = create_associado(&state, associado).await?;
    Ok(Json(serde_json::json!({ "ok": true, "id": id.to_hex() })))
}

pub async fn associados_update(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AssociadoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage members")?;
    let object_id = parse_object_id(&id)?;
    let associado = payload.into_associado()?;
    let matched = update_associado(&state, &object_id, &associado).await?;
    if matched == 0 {
        return Err(ApiError::NotFound("associado não encontrado".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn associados_delete(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage members")?;
    let object_id = parse_object_id(&id)?;
    let deleted = delete_associado(&state, &object_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("associado não encontrado".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct FamiliarPayload {
    pub nome: String,
    pub parentesco: Parentesco,
    pub data_nascimento: NaiveDate,
    pub cpf: Option<String>,
}

pub async fn familiares_index(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<FamiliarView>>> {
    session_user.require_admin("manage members")?;
    let associado_id = parse_object_id(&id)?;
    if get_associado_by_id(&state, &associado_id).await?.is_none() {
        return Err(ApiError::NotFound("associado não encontrado".to_string()));
    }
    let familiares = list_familiares(&state, &associado_id).await?;
    Ok(Json(
        familiares.into_iter().map(FamiliarView::from_model).collect(),
    ))
}

pub async fn familiares_create(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<FamiliarPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage members")?;
    let associado_id = parse_object_id(&id)?;
    if payload.nome.trim().is_empty() {
        return Err(ApiError::Validation("nome é obrigatório".to_string()));
    }
    if get_associado_by_id(&state, &associado_id).await?.is_none() {
        return Err(ApiError::NotFound("associado não encontrado".to_string()));
    }
    let familiar_id = create_familiar(
        &state,
        &associado_id,
        payload.nome.trim(),
        payload.parentesco,
        payload.data_nascimento,
        payload.cpf,
    )
    .await?;
    Ok(Json(
        serde_json::json!({ "ok": true, "id": familiar_id.to_hex() }),
    ))
}

pub async fn familiares_delete(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage members")?;
    let object_id = parse_object_id(&id)?;
    let deleted = delete_familiar(&state, &object_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("familiar não encontrado".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
