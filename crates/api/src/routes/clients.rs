//! Client CRUD and client-scoped sub-resources.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use store::Store;
use store::entities::{
    Client, IdentityDocument, Order, PhoneNumber, Role, Sale, SocialAccount,
};
use common::ClientId;
use domain::{ClientUpdate, NewClient, NewDocument, NewPhone, NewSocialAccount};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub phones: Vec<PhoneRequest>,
    #[serde(default)]
    pub social_accounts: Vec<SocialAccountRequest>,
    #[serde(default)]
    pub documents: Vec<DocumentRequest>,
}

#[derive(Deserialize)]
pub struct UpdateClientRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct PhoneRequest {
    pub number: String,
    pub kind: String,
}

#[derive(Deserialize)]
pub struct SocialAccountRequest {
    pub network: String,
    pub username: String,
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct DocumentRequest {
    pub kind: String,
    pub number: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub only_active: bool,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Deserialize)]
pub struct DocumentNumberQuery {
    pub number: String,
}

impl From<PhoneRequest> for NewPhone {
    fn from(req: PhoneRequest) -> Self {
        NewPhone {
            number: req.number,
            kind: req.kind,
        }
    }
}

impl From<SocialAccountRequest> for NewSocialAccount {
    fn from(req: SocialAccountRequest) -> Self {
        NewSocialAccount {
            network: req.network,
            username: req.username,
            url: req.url,
        }
    }
}

impl From<DocumentRequest> for NewDocument {
    fn from(req: DocumentRequest) -> Self {
        NewDocument {
            kind: req.kind,
            number: req.number,
        }
    }
}

// -- Handlers --

/// POST /clients — register a client, optionally with contacts.
#[tracing::instrument(skip(state, user, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    user.require(Role::Employee)?;
    let client = state
        .clients
        .create(NewClient {
            name: req.name,
            surname: req.surname,
            email: req.email,
            address: req.address,
            notes: req.notes,
            phones: req.phones.into_iter().map(Into::into).collect(),
            social_accounts: req.social_accounts.into_iter().map(Into::into).collect(),
            documents: req.documents.into_iter().map(Into::into).collect(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /clients — list clients, filterable by activity and name search.
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    user.require(Role::Employee)?;
    let clients = match query.search {
        Some(needle) => state.clients.search(&needle).await?,
        None => state.clients.list(query.only_active).await?,
    };
    Ok(Json(clients))
}

/// GET /clients/by-email — exact email lookup.
pub async fn by_email<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Option<Client>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.clients.find_by_email(&query.email).await?))
}

/// GET /clients/by-document — find the client owning a document number.
pub async fn by_document<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<DocumentNumberQuery>,
) -> Result<Json<Option<Client>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.clients.find_by_document(&query.number).await?))
}

/// GET /clients/:id
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Client>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.clients.get(id).await?))
}

/// PUT /clients/:id — update scalar fields.
#[tracing::instrument(skip(state, user, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    user.require(Role::Employee)?;
    let client = state
        .clients
        .update(
            id,
            ClientUpdate {
                name: req.name,
                surname: req.surname,
                email: req.email,
                address: req.address,
                notes: req.notes,
            },
        )
        .await?;
    Ok(Json(client))
}

/// DELETE /clients/:id — logical deletion, cascading to contacts.
#[tracing::instrument(skip(state, user))]
pub async fn deactivate<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Client>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.clients.deactivate(id).await?))
}

// -- Sub-resources --

/// GET /clients/:id/phones
pub async fn phones<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<PhoneNumber>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.phones.for_client(id).await?))
}

/// POST /clients/:id/phones
pub async fn add_phone<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
    Json(req): Json<PhoneRequest>,
) -> Result<(StatusCode, Json<PhoneNumber>), ApiError> {
    user.require(Role::Employee)?;
    let phone = state.phones.create(id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(phone)))
}

/// GET /clients/:id/social-accounts
pub async fn social_accounts<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<SocialAccount>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.socials.for_client(id).await?))
}

/// POST /clients/:id/social-accounts
pub async fn add_social_account<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
    Json(req): Json<SocialAccountRequest>,
) -> Result<(StatusCode, Json<SocialAccount>), ApiError> {
    user.require(Role::Employee)?;
    let social = state.socials.create(id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(social)))
}

/// GET /clients/:id/documents
pub async fn documents<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<IdentityDocument>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.documents.for_client(id).await?))
}

/// POST /clients/:id/documents
pub async fn add_document<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
    Json(req): Json<DocumentRequest>,
) -> Result<(StatusCode, Json<IdentityDocument>), ApiError> {
    user.require(Role::Employee)?;
    let document = state.documents.create(id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /clients/:id/orders
pub async fn orders<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<Order>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.orders.for_client(id).await?))
}

/// GET /clients/:id/sales
pub async fn sales<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    user.require(Role::Employee)?;
    // 404 for an unknown client rather than an empty list.
    state.clients.get(id).await?;
    Ok(Json(state.sales.for_client(id).await?))
}
