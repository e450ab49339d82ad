//! Admin-only user management endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use store::Store;
use store::entities::{Role, User};
use common::UserId;
use auth::NewUser;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// A user as exposed over the wire; the password hash never leaves the
/// server.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
    pub active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
        }
    }
}

/// POST /users — register a backend account (admin only).
#[tracing::instrument(skip(state, user, req), fields(username = %req.username))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    user.require(Role::Admin)?;
    let created = state
        .auth
        .create_user(NewUser {
            username: req.username,
            password: req.password,
            roles: req.roles,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /users — list accounts (admin only).
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    user.require(Role::Admin)?;
    let users = state.auth.list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// PUT /users/:id/active — activate or deactivate an account (admin only).
#[tracing::instrument(skip(state, user))]
pub async fn set_active<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<UserId>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    user.require(Role::Admin)?;
    let updated = state.auth.set_active(id, req.active).await?;
    Ok(Json(updated.into()))
}
