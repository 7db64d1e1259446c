// state: AppState, inicialização e re-export dos submódulos de acesso.

use anyhow::Result;
use mongodb::{Client, Collection};
use std::env;

use crate::models::{
    Agendamento, Associado, Categoria, Familiar, Lancamento, RoleRecord, Session, Usuario,
};

mod bookings;
mod finance;
mod members;
mod seed;
mod users;

pub use bookings::*;
pub use finance::*;
pub use members::*;
pub use users::*;

pub const SESSION_TTL_SECONDS: u64 = 60 * 60 * 24; // 1 dia
pub const SENHA_MIN_CHARS: usize = 6;

#[derive(Clone)]
pub struct AppState {
    pub usuarios: Collection<Usuario>,
    pub user_roles: Collection<RoleRecord>,
    pub sessions: Collection<Session>,
    pub associados: Collection<Associado>,
    pub familiares: Collection<Familiar>,
    pub categorias: Collection<Categoria>,
    pub lancamentos: Collection<Lancamento>,
    pub agendamentos: Collection<Agendamento>,
}

pub async fn init_state() -> Result<AppState> {
    let uri = env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = env::var("MONGODB_DB").unwrap_or_else(|_| "clubegest".to_string());

    let client = Client::with_uri_str(uri).await?;
    let db = client.database(&db_name);

    seed::ensure_collections(&db).await?;

    // Semeia apenas quando o banco está efetivamente vazio (sem usuários).
    if seed::is_database_empty(&db).await? {
        seed::seed_admin(&db).await?;
        seed::seed_plano_contas(&db).await?;
    }

    Ok(AppState {
        usuarios: db.collection::<Usuario>("usuarios"),
        user_roles: db.collection::<RoleRecord>("user_roles"),
        sessions: db.collection::<Session>("sessions"),
        associados: db.collection::<Associado>("associados"),
        familiares: db.collection::<Familiar>("familiares"),
        categorias: db.collection::<Categoria>("categorias_contas"),
        lancamentos: db.collection::<Lancamento>("lancamentos_financeiros"),
        agendamentos: db.collection::<Agendamento>("agendamentos"),
    })
}
