// routes/logout.rs
// POST /logout encerra a sessão atual e expira o cookie.

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::session::{SESSION_COOKIE_NAME, SessionUser};
use crate::state::{AppState, delete_session};

pub async fn logout(
    session_user: SessionUser,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    delete_session(&state, session_user.token()).await?;

    let mut response = Json(serde_json::json!({ "ok": true })).into_response();
    if let Ok(header_value) = HeaderValue::from_str(&format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )) {
        response.headers_mut().append(SET_COOKIE, header_value);
    }
    Ok(response)
}
