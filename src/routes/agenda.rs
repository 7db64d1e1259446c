// routes/agenda.rs
// Calendário mensal do salão e CRUD de agendamentos. A consulta é
// liberada para qualquer usuário autenticado; as mutações são de admin.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calendar::{agendamento_do_dia, dia_ocupado, month_grid};
use crate::error::{ApiError, ApiResult};
use crate::models::Agendamento;
use crate::routes::parse_object_id;
use crate::session::SessionUser;
use crate::state::{
    AppState, create_agendamento, delete_agendamento, get_agendamento_by_id, list_agendamentos,
    update_agendamento,
};

#[derive(Deserialize)]
pub struct AgendamentoPayload {
    pub data: NaiveDate,
    pub nome_responsavel: String,
    pub contato: String,
    pub observacoes: Option<String>,
    pub valor_cobrado: Option<Decimal>,
}

impl AgendamentoPayload {
    fn into_agendamento(self) -> Result<Agendamento, ApiError> {
        if self.nome_responsavel.trim().is_empty() {
            return Err(ApiError::Validation(
                "nome_responsavel é obrigatório".to_string(),
            ));
        }
        if self.contato.trim().is_empty() {
            return Err(ApiError::Validation("contato é obrigatório".to_string()));
        }
        if let Some(valor) = self.valor_cobrado {
            if valor < Decimal::ZERO {
                return Err(ApiError::Validation(
                    "valor não pode ser negativo".to_string(),
                ));
            }
        }
        Ok(Agendamento {
            id: None,
            data: self.data,
            nome_responsavel: self.nome_responsavel.trim().to_string(),
            contato: self.contato.trim().to_string(),
            observacoes: self.observacoes,
            valor_cobrado: self.valor_cobrado,
        })
    }
}

#[derive(Serialize)]
pub struct AgendamentoView {
    pub id: String,
    pub data: NaiveDate,
    pub nome_responsavel: String,
    pub contato: String,
    pub observacoes: Option<String>,
    pub valor_cobrado: Option<Decimal>,
}

impl AgendamentoView {
    fn from_model(agendamento: &Agendamento) -> Self {
        AgendamentoView {
            id: agendamento.id.map(|id| id.to_hex()).unwrap_or_default(),
            data: agendamento.data,
            nome_responsavel: agendamento.nome_responsavel.clone(),
            contato: agendamento.contato.clone(),
            observacoes: agendamento.observacoes.clone(),
            valor_cobrado: agendamento.valor_cobrado,
        }
    }
}

#[derive(Deserialize)]
pub struct AgendaQuery {
    pub ano: Option<i32>,
    pub mes: Option<u32>,
}

#[derive(Serialize)]
pub struct DiaAgenda {
    /// `None` nas células em branco antes do dia 1.
    pub data: Option<NaiveDate>,
    pub ocupado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agendamento: Option<AgendamentoView>,
}

#[derive(Serialize)]
pub struct AgendaMensal {
    pub ano: i32,
    pub mes: u32,
    pub dias: Vec<DiaAgenda>,
    pub proximos: Vec<AgendamentoView>,
}

pub async fn agenda_mensal(
    _session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<AgendaQuery>,
) -> ApiResult<Json<AgendaMensal>> {
    let hoje = Local::now().date_naive();
    let ano = query.ano.unwrap_or_else(|| hoje.year());
    let mes = query.mes.unwrap_or_else(|| hoje.month());
    if !(1..=12).contains(&mes) {
        return Err(ApiError::Validation("mês inválido".to_string()));
    }

    let agendamentos = list_agendamentos(&state).await?;

    let dias = month_grid(ano, mes)
        .into_iter()
        .map(|celula| match celula {
            Some(data) => DiaAgenda {
                data: Some(data),
                ocupado: dia_ocupado(&agendamentos, data),
                agendamento: agendamento_do_dia(&agendamentos, data)
                    .map(AgendamentoView::from_model),
            },
            None => DiaAgenda {
                data: None,
                ocupado: false,
                agendamento: None,
            },
        })
        .collect();

    // A lista já vem por data crescente
    let proximos = agendamentos
        .iter()
        .filter(|a| a.data >= hoje)
        .map(AgendamentoView::from_model)
        .collect();

    Ok(Json(AgendaMensal {
        ano,
        mes,
        dias,
        proximos,
    }))
}

pub async fn agendamentos_index(
    _session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AgendamentoView>>> {
    let agendamentos = list_agendamentos(&state).await?;
    Ok(Json(
        agendamentos.iter().map(AgendamentoView::from_model).collect(),
    ))
}

pub async fn agendamentos_create(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AgendamentoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage bookings")?;
    let agendamento = payload.into_agendamento()?;
    let id = create_agendamento(&state, agendamento).await?;
    Ok(Json(serde_json::json!({ "ok": true, "id": id.to_hex() })))
}

pub async fn agendamentos_update(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AgendamentoPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage bookings")?;
    let object_id = parse_object_id(&id)?;
    if get_agendamento_by_id(&state, &object_id).await?.is_none() {
        return Err(ApiError::NotFound("agendamento não encontrado".to_string()));
    }
    let agendamento = payload.into_agendamento()?;
    update_agendamento(&state, &object_id, &agendamento).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn agendamentos_delete(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    session_user.require_admin("manage bookings")?;
    let object_id = parse_object_id(&id)?;
    let deleted = delete_agendamento(&state, &object_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("agendamento não encontrado".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
