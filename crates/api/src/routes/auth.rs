//! Login and current-user endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use store::Store;
use store::entities::Role;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub roles: Vec<Role>,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub username: String,
    pub roles: Vec<Role>,
}

/// POST /auth/login — exchange credentials for a bearer token.
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn login<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state.auth.authenticate(&req.username, &req.password).await?;
    Ok(Json(LoginResponse {
        token: outcome.token,
        username: outcome.username,
        roles: outcome.roles,
    }))
}

/// GET /auth/me — identify the caller behind the bearer token.
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.0.username,
        roles: user.0.roles,
    })
}
