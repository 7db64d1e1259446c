use anyhow::{Context, Result};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document};

use crate::models::Agendamento;

use super::AppState;

/// Agendamentos por data crescente. As datas são armazenadas como texto
/// ISO, então a ordenação do banco coincide com a cronológica.
pub async fn list_agendamentos(state: &AppState) -> Result<Vec<Agendamento>> {
    let cursor = state
        .agendamentos
        .find(doc! {})
        .sort(doc! { "data": 1 })
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn get_agendamento_by_id(state: &AppState, id: &ObjectId) -> Result<Option<Agendamento>> {
    let agendamento = state.agendamentos.find_one(doc! { "_id": id }).await?;
    Ok(agendamento)
}

pub async fn create_agendamento(state: &AppState, agendamento: Agendamento) -> Result<ObjectId> {
    let res = state.agendamentos.insert_one(agendamento).await?;
    res.inserted_id
        .as_object_id()
        .context("insert de agendamento sem _id")
}

pub async fn update_agendamento(
    state: &AppState,
    id: &ObjectId,
    agendamento: &Agendamento,
) -> Result<u64> {
    let mut set = to_document(agendamento)?;
    set.remove("_id");
    let res = state
        .agendamentos
        .update_one(doc! { "_id": id }, doc! { "$set": set })
        .await?;
    Ok(res.matched_count)
}

pub async fn delete_agendamento(state: &AppState, id: &ObjectId) -> Result<u64> {
    let res = state.agendamentos.delete_one(doc! { "_id": id }).await?;
    Ok(res.deleted_count)
}
