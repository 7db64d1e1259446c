// routes/finance.rs
// Plano de contas e lançamentos financeiros, restritos a administradores.
// O tipo de cada lançamento deve coincidir com o tipo da categoria.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{Categoria, FlowType, Lancamento};
use crate::reports::{ResumoFinanceiro, mais_recentes, resumo};
use crate::routes::parse_object_id;
use crate::session::SessionUser;
use crate::state::{
    AppState, LancamentoComCategoria, categoria_em_uso, create_categoria, create_lancamento,
    delete_categoria, delete_lancamento, get_categoria_by_id, list_categorias, list_lancamentos,
    update_categoria, update_lancamento,
};

#[derive(Deserialize)]
pub struct CategoriaPayload {
    pub nome: String,
    pub tipo: String,
    pub descricao: Option<String>,
}

#[derive(Serialize)]
pub struct CategoriaView {
    pub id: String,
    pub nome: String,
    pub tipo: FlowType,
    pub descricao: Option<String>,
}

impl CategoriaView {
    fn from_model(categoria: Categoria) -> Self {
        CategoriaView {
            id: categoria.id.map(|id| id.to_hex()).unwrap_or_default(),
            nome: categoria.nome,
            tipo: categoria.tipo,
            descricao: categoria.descricao,
        }
    }
}

fn parse_tipo(raw: &str) -> Result<FlowType, ApiError> {
    FlowType::parse(raw.trim())
        .ok_or_else(|| ApiError::Validation("tipo deve ser receita ou despesa".to_string()))
}

fn validate_categoria(payload: &CategoriaPayload) -> Result<FlowType, ApiError> {
    if payload.nome.trim().is_empty() {
        return Err(ApiError::Validation("nome é obrigatório".to_string()));
    }
    parse_tipo(&payload.tipo)
}

pub async fn categorias_index(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoriaView>>> {
    session_user.require_admin("manage finances")?;
    let categorias = list_categorias(&state).await?;
    Ok(Json(
        categorias.into_iter().map(CategoriaView::from_model).collect(),
    ))
}

pub async fn categorias_create(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategoriaPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage finances")?;
    let tipo = validate_categoria(&payload)?;
    let id = create_categoria(&state, payload.nome.trim(), tipo, payload.descricao).await?;
    Ok(Json(serde_json::json!({ "ok": true, "id": id.to_hex() })))
}

pub async fn categorias_update(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CategoriaPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage finances")?;
    let object_id = parse_object_id(&id)?;
    let tipo = validate_categoria(&payload)?;
    let matched =
        update_categoria(&state, &object_id, payload.nome.trim(), tipo, payload.descricao).await?;
    if matched == 0 {
        return Err(ApiError::NotFound("categoria não encontrada".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn categorias_delete(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage finances")?;
    let object_id = parse_object_id(&id)?;
    if categoria_em_uso(&state, &object_id).await? {
        return Err(ApiError::Conflict(
            "categoria em uso por lançamentos".to_string(),
        ));
    }
    let deleted = delete_categoria(&state, &object_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("categoria não encontrada".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct LancamentoPayload {
    pub data: NaiveDate,
    pub descricao: String,
    pub valor: Decimal,
    pub tipo: String,
    pub categoria_id: String,
    pub observacoes: Option<String>,
}

#[derive(Serialize)]
pub struct LancamentoView {
    pub id: String,
    pub data: NaiveDate,
    pub descricao: String,
    pub valor: Decimal,
    pub tipo: FlowType,
    pub categoria_id: String,
    pub observacoes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<CategoriaView>,
}

impl LancamentoView {
    pub fn from_model(lancamento: Lancamento) -> Self {
        LancamentoView {
            id: lancamento.id.map(|id| id.to_hex()).unwrap_or_default(),
            data: lancamento.data,
            descricao: lancamento.descricao,
            valor: lancamento.valor,
            tipo: lancamento.tipo,
            categoria_id: lancamento.categoria_id.to_hex(),
            observacoes: lancamento.observacoes,
            categoria: None,
        }
    }

    pub fn from_joined(joined: LancamentoComCategoria) -> Self {
        let mut view = LancamentoView::from_model(joined.lancamento);
        view.categoria = joined.categoria.map(CategoriaView::from_model);
        view
    }
}

struct LancamentoValidado {
    tipo: FlowType,
    categoria_id: mongodb::bson::oid::ObjectId,
}

/// Valida descrição, valor e a categoria (existência e tipo compatível).
async fn validate_lancamento(
    state: &AppState,
    payload: &LancamentoPayload,
) -> Result<LancamentoValidado, ApiError> {
    if payload.descricao.trim().is_empty() {
        return Err(ApiError::Validation("descrição é obrigatória".to_string()));
    }
    if payload.valor < Decimal::ZERO {
        return Err(ApiError::Validation(
            "valor não pode ser negativo".to_string(),
        ));
    }
    let tipo = parse_tipo(&payload.tipo)?;
    let categoria_id = parse_object_id(&payload.categoria_id)?;
    let categoria = get_categoria_by_id(state, &categoria_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("categoria não encontrada".to_string()))?;
    if categoria.tipo != tipo {
        return Err(ApiError::Conflict(
            "tipo do lançamento não corresponde ao tipo da categoria".to_string(),
        ));
    }
    Ok(LancamentoValidado { tipo, categoria_id })
}

pub async fn lancamentos_index(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LancamentoView>>> {
    session_user.require_admin("manage finances")?;
    let lancamentos = list_lancamentos(&state).await?;
    Ok(Json(
        lancamentos.into_iter().map(LancamentoView::from_joined).collect(),
    ))
}

pub async fn lancamentos_create(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LancamentoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage finances")?;
    let validado = validate_lancamento(&state, &payload).await?;
    let id = create_lancamento(
        &state,
        payload.data,
        payload.descricao.trim(),
        payload.valor,
        validado.tipo,
        &validado.categoria_id,
        payload.observacoes,
    )
    .await?;
    Ok(Json(serde_json::json!({ "ok": true, "id": id.to_hex() })))
}

pub async fn lancamentos_update(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<LancamentoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage finances")?;
    let object_id = parse_object_id(&id)?;
    let validado = validate_lancamento(&state, &payload).await?;
    let matched = update_lancamento(
        &state,
        &object_id,
        payload.data,
        payload.descricao.trim(),
        payload.valor,
        validado.tipo,
        &validado.categoria_id,
        payload.observacoes,
    )
    .await?;
    if matched == 0 {
        return Err(ApiError::NotFound("lançamento não encontrado".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn lancamentos_delete(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage finances")?;
    let object_id = parse_object_id(&id)?;
    let deleted = delete_lancamento(&state, &object_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("lançamento não encontrado".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Serialize)]
pub struct ResumoView {
    #[serde(flatten)]
    pub resumo: ResumoFinanceiro,
    pub recentes: Vec<LancamentoView>,
}

/// Painel financeiro: totais acumulados e os cinco lançamentos mais
/// recentes.
pub async fn resumo_financeiro(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ResumoView>> {
    session_user.require_admin("manage finances")?;
    let joined = list_lancamentos(&state).await?;
    let lancamentos: Vec<Lancamento> = joined.iter().map(|j| j.lancamento.clone()).collect();
    let totais = resumo(&lancamentos);
    let recentes = mais_recentes(&lancamentos, 5)
        .into_iter()
        .map(LancamentoView::from_model)
        .collect();
    Ok(Json(ResumoView {
        resumo: totais,
        recentes,
    }))
}
