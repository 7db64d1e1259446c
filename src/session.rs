// session.rs
// Middleware de sessão para proteger rotas e extractor para acessar os
// dados da sessão. O token é aceito como cookie ou `Authorization: Bearer`.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, header::COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use mongodb::bson::oid::ObjectId;

use crate::error::ApiError;
use crate::models::UserRole;
use crate::state::{AppState, AuthUser, find_user_by_session};

pub const SESSION_COOKIE_NAME: &str = "session";

/// Decisão única de autorização usada por middleware e handlers.
pub fn can_access(role: &UserRole, requirement: Option<&UserRole>) -> bool {
    match requirement {
        Some(required) => role == required,
        None => true,
    }
}

#[derive(Clone)]
pub struct SessionData {
    pub user: AuthUser,
    pub token: String,
}

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let tokens = extract_tokens(request.headers());
    if tokens.is_empty() {
        return Err(unauthorized_response());
    }

    // Tenta todos os tokens apresentados até encontrar uma sessão válida
    let mut found = None;
    for token in tokens {
        match find_user_by_session(&state, &token).await {
            Ok(Some(user)) => {
                found = Some((user, token));
                break;
            }
            Ok(None) => continue,
            Err(e) => return Err(ApiError::Internal(e).into_response()),
        }
    }

    if let Some((user, token)) = found {
        request.extensions_mut().insert(SessionData { user, token });
        Ok(next.run(request).await)
    } else {
        Err(unauthorized_response())
    }
}

pub struct SessionUser(pub SessionData);

impl SessionUser {
    pub fn user(&self) -> &AuthUser {
        &self.0.user
    }

    pub fn token(&self) -> &str {
        &self.0.token
    }

    pub fn user_id(&self) -> &ObjectId {
        &self.0.user.id
    }

    pub fn role(&self) -> &UserRole {
        &self.0.user.role
    }

    pub fn is_admin(&self) -> bool {
        can_access(self.role(), Some(&UserRole::Admin))
    }

    pub fn require_admin(&self, action: &str) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("Only admins can {action}")))
        }
    }
}

#[allow(refining_impl_trait)]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> BoxFuture<'static, Result<Self, Self::Rejection>> {
        let data = parts
            .extensions
            .get::<SessionData>()
            .cloned()
            .ok_or_else(unauthorized_response);

        Box::pin(async move {
            match data {
                Ok(session) => Ok(SessionUser(session)),
                Err(resp) => Err(resp),
            }
        })
    }
}

fn unauthorized_response() -> Response {
    ApiError::Unauthorized("não autenticado".to_string()).into_response()
}

fn extract_tokens(headers: &HeaderMap) -> Vec<String> {
    let mut tokens = extract_cookies(headers, SESSION_COOKIE_NAME);
    if let Some(bearer) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        let bearer = bearer.trim();
        if !bearer.is_empty() {
            tokens.push(bearer.to_owned());
        }
    }
    tokens
}

fn extract_cookies(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(COOKIE)
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut split = pair.trim().splitn(2, '=');
            let key = split.next()?.trim();
            let value = split.next()?.trim();
            if key == name {
                Some(value.to_owned())
            } else {
                None
            }
        })
        .collect()
}
