// routes/mod.rs
// Montagem do Router e utilitários compartilhados pelos handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use mongodb::bson::oid::ObjectId;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::session::require_session;
use crate::state::AppState;

pub mod admin;
pub mod agenda;
pub mod finance;
pub mod home;
pub mod login;
pub mod logout;
pub mod members;
pub mod reports;

pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::from_str(raw.trim())
        .map_err(|_| ApiError::Validation("identificador inválido".to_string()))
}

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/me", get(home::me))
        .route("/logout", post(logout::logout))
        .route(
            "/associados",
            get(members::associados_index).post(members::associados_create),
        )
        .route("/associados/{id}", get(members::associados_show))
        .route("/associados/{id}/update", post(members::associados_update))
        .route("/associados/{id}/delete", post(members::associados_delete))
        .route(
            "/associados/{id}/familiares",
            get(members::familiares_index).post(members::familiares_create),
        )
        .route("/familiares/{id}/delete", post(members::familiares_delete))
        .route(
            "/categorias",
            get(finance::categorias_index).post(finance::categorias_create),
        )
        .route("/categorias/{id}/update", post(finance::categorias_update))
        .route("/categorias/{id}/delete", post(finance::categorias_delete))
        .route(
            "/financeiro",
            get(finance::lancamentos_index).post(finance::lancamentos_create),
        )
        .route("/financeiro/resumo", get(finance::resumo_financeiro))
        .route("/financeiro/{id}/update", post(finance::lancamentos_update))
        .route("/financeiro/{id}/delete", post(finance::lancamentos_delete))
        .route("/agenda", get(agenda::agenda_mensal))
        .route(
            "/agendamentos",
            get(agenda::agendamentos_index).post(agenda::agendamentos_create),
        )
        .route("/agendamentos/{id}/update", post(agenda::agendamentos_update))
        .route("/agendamentos/{id}/delete", post(agenda::agendamentos_delete))
        .route("/relatorios/associados", get(reports::relatorio_associados))
        .route("/relatorios/financeiro", get(reports::relatorio_financeiro))
        .route(
            "/admin/users",
            get(admin::users::users_index).post(admin::users::users_create),
        )
        .route("/admin/users/manage", post(admin::users::users_manage))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/", get(home::home))
        .route("/login", post(login::login))
        .route("/signup", post(login::signup))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
