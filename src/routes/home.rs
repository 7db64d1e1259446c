// routes/home.rs
// GET / é público; GET /me devolve o usuário da sessão.

use axum::Json;

use crate::routes::login::UserView;
use crate::session::SessionUser;

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "clubegest",
        "status": "ok",
    }))
}

pub async fn me(session_user: SessionUser) -> Json<UserView> {
    Json(UserView::from_auth(session_user.user()))
}
