//! Admin gate.
//!
//! Sessions live in the hosted auth service; this side only exchanges
//! credentials for a token on login and verifies the bearer token on every
//! admin call. Public board routes bypass the gate entirely.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResult>, AppError> {
    match state.auth.sign_in(form.email.trim(), &form.password).await {
        Ok(session) => {
            info!("Admin session opened");
            Ok(Json(LoginResult {
                ok: true,
                access_token: Some(session.access_token),
                error: None,
            }))
        }
        Err(e) => {
            let message = match e.to_string().as_str() {
                "Invalid login credentials" => "Credenciales inválidas".to_string(),
                other => other.to_string(),
            };
            Ok(Json(LoginResult {
                ok: false,
                access_token: None,
                error: Some(message),
            }))
        }
    }
}

pub async fn signout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<LoginResult>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    state
        .auth
        .sign_out(token)
        .await
        .map_err(|_| AppError::Unauthorized)?;
    info!("Admin session closed");
    Ok(Json(LoginResult {
        ok: true,
        access_token: None,
        error: None,
    }))
}

/// Rejects any admin call whose bearer token the auth service does not
/// recognize.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    state
        .auth
        .user(token)
        .await
        .map_err(|_| AppError::Unauthorized)?;
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
