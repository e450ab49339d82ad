//! Order endpoints: CRUD, lifecycle transitions and totals.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::Store;
use store::entities::{Order, OrderStatus, Role, Sale};
use common::{ClientId, OrderId, ProductId};
use domain::NewOrderLine;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub client_id: ClientId,
    pub lines: Vec<OrderLineRequest>,
    /// Initial status; defaults to PENDING, terminal values are rejected.
    pub status: Option<OrderStatus>,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub client_id: ClientId,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Deserialize)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub open: bool,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct TotalResponse {
    pub order_id: OrderId,
    pub total_cents: i64,
}

fn lines(req: Vec<OrderLineRequest>) -> Vec<NewOrderLine> {
    req.into_iter()
        .map(|l| NewOrderLine {
            product_id: l.product_id,
            quantity: l.quantity,
        })
        .collect()
}

// -- Handlers --

/// POST /orders
#[tracing::instrument(skip(state, user, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    user.require(Role::Employee)?;
    let order = state
        .orders
        .create(req.client_id, lines(req.lines), req.status)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders — list, filterable by status, openness or creation window.
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    user.require(Role::Employee)?;
    let orders = if let Some(status) = query.status {
        state.orders.by_status(status).await?
    } else if query.open {
        state.orders.open().await?
    } else if let (Some(from), Some(to)) = (query.from, query.to) {
        state.orders.created_between(from, to).await?
    } else {
        state.orders.list().await?
    };
    Ok(Json(orders))
}

/// GET /orders/:id
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.orders.get(id).await?))
}

/// PUT /orders/:id — replace client and lines; status is untouched.
#[tracing::instrument(skip(state, user, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    user.require(Role::Employee)?;
    let order = state
        .orders
        .update(id, req.client_id, lines(req.lines))
        .await?;
    Ok(Json(order))
}

/// POST /orders/:id/status — drive the lifecycle state machine.
#[tracing::instrument(skip(state, user))]
pub async fn transition<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<OrderId>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Order>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.orders.transition(id, req.status).await?))
}

/// DELETE /orders/:id — hard delete, PENDING orders only.
#[tracing::instrument(skip(state, user))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<OrderId>,
) -> Result<StatusCode, ApiError> {
    user.require(Role::Employee)?;
    state.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /orders/:id/total — priced at the products' current prices.
pub async fn total<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<TotalResponse>, ApiError> {
    user.require(Role::Employee)?;
    let total = state.orders.total(id).await?;
    Ok(Json(TotalResponse {
        order_id: id,
        total_cents: total.cents(),
    }))
}

/// GET /orders/:id/sale — the sale recorded for this order, if any.
pub async fn sale<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Option<Sale>>, ApiError> {
    user.require(Role::Employee)?;
    state.orders.get(id).await?;
    Ok(Json(state.sales.for_order(id).await?))
}
