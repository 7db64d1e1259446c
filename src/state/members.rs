use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document};

use crate::models::{Associado, Familiar, Parentesco};

use super::AppState;

pub async fn list_associados(state: &AppState) -> Result<Vec<Associado>> {
    let cursor = state
        .associados
        .find(doc! {})
        .sort(doc! { "nome_completo": 1 })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn get_associado_by_id(state: &AppState, id: &ObjectId) -> Result<Option<Associado>> {
    let associado = state.associados.find_one(doc! { "_id": id }).await?;
    Ok(associado)
}

pub async fn create_associado(state: &AppState, associado: Associado) -> Result<ObjectId> {
    let res = state.associados.insert_one(associado).await?;
    res.inserted_id
        .as_object_id()
        .context("insert de associado sem _id")
}

pub async fn update_associado(
    state: &AppState,
    id: &ObjectId,
    associado: &Associado,
) -> Result<u64> {
    let mut set = to_document(associado)?;
    set.remove("_id");
    let res = state
        .associados
        .update_one(doc! { "_id": id }, doc! { "$set": set })
        .await?;
    Ok(res.matched_count)
}

/// Remove o associado e, em cascata, seus familiares.
pub async fn delete_associado(state: &AppState, id: &ObjectId) -> Result<u64> {
    let _ = state
        .familiares
        .delete_many(doc! { "associado_id": id })
        .await;
    let res = state.associados.delete_one(doc! { "_id": id }).await?;
    Ok(res.deleted_count)
}

pub async fn list_familiares(state: &AppState, associado_id: &ObjectId) -> Result<Vec<Familiar>> {
    let cursor = state
        .familiares
        .find(doc! { "associado_id": associado_id })
        .sort(doc! { "nome": 1 })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn create_familiar(
    state: &AppState,
    associado_id: &ObjectId,
    nome: &str,
    parentesco: Parentesco,
    data_nascimento: NaiveDate,
    cpf: Option<String>,
) -> Result<ObjectId> {
    let res = state
        .familiares
        .insert_one(Familiar {
            id: None,
            associado_id: *associado_id,
            nome: nome.to_string(),
            parentesco,
            data_nascimento,
            cpf,
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("insert de familiar sem _id")
}

pub async fn delete_familiar(state: &AppState, id: &ObjectId) -> Result<u64> {
    let res = state.familiares.delete_one(doc! { "_id": id }).await?;
    Ok(res.deleted_count)
}
