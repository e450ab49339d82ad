//! Standalone contact endpoints: update, lookup and logical deletion of
//! phones, social accounts and identity documents.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use store::Store;
use store::entities::{IdentityDocument, PhoneNumber, Role, SocialAccount};
use common::{DocumentId, PhoneId, SocialAccountId};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::clients::{DocumentRequest, PhoneRequest, SocialAccountRequest};

#[derive(Deserialize)]
pub struct PhoneSearchQuery {
    pub search: String,
}

#[derive(Deserialize)]
pub struct NetworkQuery {
    pub network: String,
}

/// GET /phones — substring search over stored numbers.
pub async fn search_phones<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<PhoneSearchQuery>,
) -> Result<Json<Vec<PhoneNumber>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.phones.search(&query.search).await?))
}

/// PUT /phones/:id
pub async fn update_phone<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<PhoneId>,
    Json(req): Json<PhoneRequest>,
) -> Result<Json<PhoneNumber>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.phones.update(id, req.into()).await?))
}

/// DELETE /phones/:id — logical deletion.
pub async fn deactivate_phone<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<PhoneId>,
) -> Result<Json<PhoneNumber>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.phones.deactivate(id).await?))
}

/// GET /social-accounts — filter by network.
pub async fn socials_by_network<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<NetworkQuery>,
) -> Result<Json<Vec<SocialAccount>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.socials.by_network(&query.network).await?))
}

/// PUT /social-accounts/:id
pub async fn update_social<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<SocialAccountId>,
    Json(req): Json<SocialAccountRequest>,
) -> Result<Json<SocialAccount>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.socials.update(id, req.into()).await?))
}

/// DELETE /social-accounts/:id — logical deletion.
pub async fn deactivate_social<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<SocialAccountId>,
) -> Result<Json<SocialAccount>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.socials.deactivate(id).await?))
}

/// PUT /documents/:id
pub async fn update_document<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<DocumentId>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<IdentityDocument>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.documents.update(id, req.into()).await?))
}

/// DELETE /documents/:id — logical deletion.
pub async fn deactivate_document<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<DocumentId>,
) -> Result<Json<IdentityDocument>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.documents.deactivate(id).await?))
}
