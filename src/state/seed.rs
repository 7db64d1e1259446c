// Criação das coleções e carga inicial de um banco vazio: usuário
// administrador e categorias padrão do plano de contas.

use anyhow::Result;
use mongodb::Database;
use mongodb::bson::DateTime;
use std::env;

use crate::models::{Categoria, FlowType, RoleRecord, UserRole, Usuario};

const COLLECTIONS: &[&str] = &[
    "usuarios",
    "user_roles",
    "sessions",
    "associados",
    "familiares",
    "categorias_contas",
    "lancamentos_financeiros",
    "agendamentos",
];

pub async fn ensure_collections(db: &Database) -> Result<()> {
    let existing = db.list_collection_names().await?;
    for name in COLLECTIONS {
        if !existing.iter().any(|c| c == name) {
            db.create_collection(*name).await?;
        }
    }
    Ok(())
}

pub async fn is_database_empty(db: &Database) -> Result<bool> {
    let usuarios = db.collection::<Usuario>("usuarios");
    Ok(usuarios.estimated_document_count().await? == 0)
}

pub async fn seed_admin(db: &Database) -> Result<()> {
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@clube.local".to_string());
    let senha = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let nome = env::var("ADMIN_NOME").unwrap_or_else(|_| "Administrador".to_string());

    let usuarios = db.collection::<Usuario>("usuarios");
    let res = usuarios
        .insert_one(Usuario {
            id: None,
            nome,
            email: super::normalize_email(&email),
            senha_hash: super::hash_password(&senha)?,
            ativo: true,
            criado_em: Some(DateTime::now()),
        })
        .await?;

    if let Some(user_id) = res.inserted_id.as_object_id() {
        let user_roles = db.collection::<RoleRecord>("user_roles");
        user_roles
            .insert_one(RoleRecord {
                id: None,
                user_id,
                role: UserRole::Admin,
            })
            .await?;
    }

    tracing::info!("usuário administrador inicial criado");
    Ok(())
}

pub async fn seed_plano_contas(db: &Database) -> Result<()> {
    let categorias = db.collection::<Categoria>("categorias_contas");
    let padrao = [
        ("Mensalidade", FlowType::Receita, "Mensalidade dos associados"),
        ("Aluguel do Salão", FlowType::Receita, "Locação do salão de festas"),
        ("Manutenção", FlowType::Despesa, "Manutenção das instalações"),
    ];
    for (nome, tipo, descricao) in padrao {
        categorias
            .insert_one(Categoria {
                id: None,
                nome: nome.to_string(),
                tipo,
                descricao: Some(descricao.to_string()),
            })
            .await?;
    }
    Ok(())
}
