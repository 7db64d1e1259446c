// routes/reports.rs
// Relatórios de associados e financeiro, com filtros por querystring.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{FlowType, StatusAssociado};
use crate::reports::{ResumoFinanceiro, dentro_periodo, filtra_associados, resumo, tipo_corresponde};
use crate::routes::finance::LancamentoView;
use crate::routes::members::AssociadoView;
use crate::session::SessionUser;
use crate::state::{AppState, LancamentoComCategoria, list_associados, list_lancamentos};

#[derive(Deserialize)]
pub struct RelatorioAssociadosQuery {
    pub status: Option<String>,
    pub inicio: Option<NaiveDate>,
    pub fim: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct RelatorioAssociados {
    pub total: usize,
    pub associados: Vec<AssociadoView>,
}

pub async fn relatorio_associados(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RelatorioAssociadosQuery>,
) -> ApiResult<Json<RelatorioAssociados>> {
    session_user.require_admin("view reports")?;

    let status = match query.status.as_deref() {
        None | Some("") | Some("todos") => None,
        Some(raw) => Some(StatusAssociado::parse(raw).ok_or_else(|| {
            ApiError::Validation("status deve ser ativo, inativo ou todos".to_string())
        })?),
    };

    let associados = list_associados(&state).await?;
    let filtrados = filtra_associados(&associados, status, query.inicio, query.fim);
    Ok(Json(RelatorioAssociados {
        total: filtrados.len(),
        associados: filtrados.into_iter().map(AssociadoView::from_model).collect(),
    }))
}

#[derive(Deserialize)]
pub struct RelatorioFinanceiroQuery {
    pub inicio: Option<NaiveDate>,
    pub fim: Option<NaiveDate>,
    pub tipo: Option<String>,
}

#[derive(Serialize)]
pub struct RelatorioFinanceiro {
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
    pub tipo: &'static str,
    pub resumo: ResumoFinanceiro,
    pub lancamentos: Vec<LancamentoView>,
}

/// Período padrão: o ano corrente inteiro, todos os tipos.
pub async fn relatorio_financeiro(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RelatorioFinanceiroQuery>,
) -> ApiResult<Json<RelatorioFinanceiro>> {
    session_user.require_admin("view reports")?;

    let ano = Local::now().date_naive().year();
    let inicio = query
        .inicio
        .or_else(|| NaiveDate::from_ymd_opt(ano, 1, 1))
        .ok_or_else(|| ApiError::Validation("período inválido".to_string()))?;
    let fim = query
        .fim
        .or_else(|| NaiveDate::from_ymd_opt(ano, 12, 31))
        .ok_or_else(|| ApiError::Validation("período inválido".to_string()))?;

    let filtro = match query.tipo.as_deref() {
        None | Some("") | Some("todos") => None,
        Some(raw) => Some(FlowType::parse(raw).ok_or_else(|| {
            ApiError::Validation("tipo deve ser receita, despesa ou todos".to_string())
        })?),
    };

    // Filtra sobre as linhas já com a categoria resolvida, para que a
    // listagem do relatório saia com o nome da categoria em cada linha
    let filtrados: Vec<LancamentoComCategoria> = list_lancamentos(&state)
        .await?
        .into_iter()
        .filter(|j| {
            dentro_periodo(j.lancamento.data, inicio, fim)
                && tipo_corresponde(j.lancamento.tipo, filtro)
        })
        .collect();
    let totais = resumo(filtrados.iter().map(|j| &j.lancamento));

    Ok(Json(RelatorioFinanceiro {
        inicio,
        fim,
        tipo: filtro.map(|f| f.as_str()).unwrap_or("todos"),
        resumo: totais,
        lancamentos: filtrados.into_iter().map(LancamentoView::from_joined).collect(),
    }))
}
