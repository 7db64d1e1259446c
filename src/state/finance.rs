use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Categoria, FlowType, Lancamento};

use super::AppState;

pub async fn list_categorias(state: &AppState) -> Result<Vec<Categoria>> {
    let cursor = state
        .categorias
        .find(doc! {})
        .sort(doc! { "nome": 1 })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn get_categoria_by_id(state: &AppState, id: &ObjectId) -> Result<Option<Categoria>> {
    let categoria = state.categorias.find_one(doc! { "_id": id }).await?;
    Ok(categoria)
}

pub async fn create_categoria(
    state: &AppState,
    nome: &str,
    tipo: FlowType,
    descricao: Option<String>,
) -> Result<ObjectId> {
    let res = state
        .categorias
        .insert_one(Categoria {
            id: None,
            nome: nome.to_string(),
            tipo,
            descricao,
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("insert de categoria sem _id")
}

pub async fn update_categoria(
    state: &AppState,
    id: &ObjectId,
    nome: &str,
    tipo: FlowType,
    descricao: Option<String>,
) -> Result<u64> {
    let res = state
        .categorias
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "nome": nome, "tipo": tipo.as_str(), "descricao": descricao } },
        )
        .await?;
    Ok(res.matched_count)
}

/// Uma categoria referenciada por algum lançamento não pode ser removida.
pub async fn categoria_em_uso(state: &AppState, id: &ObjectId) -> Result<bool> {
    let existe = state
        .lancamentos
        .find_one(doc! { "categoria_id": id })
        .await?;
    Ok(existe.is_some())
}

pub async fn delete_categoria(state: &AppState, id: &ObjectId) -> Result<u64> {
    let res = state.categorias.delete_one(doc! { "_id": id }).await?;
    Ok(res.deleted_count)
}

/// Lançamento com a categoria resolvida para exibição.
#[derive(Debug, Clone, Serialize)]
pub struct LancamentoComCategoria {
    #[serde(flatten)]
    pub lancamento: Lancamento,
    pub categoria: Option<Categoria>,
}

/// Lançamentos por data decrescente, com a categoria de cada um.
pub async fn list_lancamentos(state: &AppState) -> Result<Vec<LancamentoComCategoria>> {
    let mut categorias: HashMap<ObjectId, Categoria> = HashMap::new();
    let mut cursor = state.categorias.find(doc! {}).await?;
    while let Some(categoria) = cursor.try_next().await? {
        if let Some(id) = categoria.id {
            categorias.insert(id, categoria);
        }
    }

    let mut cursor = state
        .lancamentos
        .find(doc! {})
        .sort(doc! { "data": -1 })
        .await?;
    let mut lancamentos = Vec::new();
    while let Some(lancamento) = cursor.try_next().await? {
        let categoria = categorias.get(&lancamento.categoria_id).cloned();
        lancamentos.push(LancamentoComCategoria {
            lancamento,
            categoria,
        });
    }
    Ok(lancamentos)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_lancamento(
    state: &AppState,
    data: NaiveDate,
    descricao: &str,
    valor: Decimal,
    tipo: FlowType,
    categoria_id: &ObjectId,
    observacoes: Option<String>,
) -> Result<ObjectId> {
    let res = state
        .lancamentos
        .insert_one(Lancamento {
            id: None,
            data,
            descricao: descricao.to_string(),
            valor,
            tipo,
            categoria_id: *categoria_id,
            observacoes,
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("insert de lançamento sem _id")
}

#[allow(clippy::too_many_arguments)]
pub async fn update_lancamento(
    state: &AppState,
    id: &ObjectId,
    data: NaiveDate,
    descricao: &str,
    valor: Decimal,
    tipo: FlowType,
    categoria_id: &ObjectId,
    observacoes: Option<String>,
) -> Result<u64> {
    let mut set = to_document(&Lancamento {
        id: None,
        data,
        descricao: descricao.to_string(),
        valor,
        tipo,
        categoria_id: *categoria_id,
        observacoes,
    })?;
    set.remove("_id");
    let res = state
        .lancamentos
        .update_one(doc! { "_id": id }, doc! { "$set": set })
        .await?;
    Ok(res.matched_count)
}

pub async fn delete_lancamento(state: &AppState, id: &ObjectId) -> Result<u64> {
    let res = state.lancamentos.delete_one(doc! { "_id": id }).await?;
    Ok(res.deleted_count)
}
