//! Sale endpoints: recording, delivery and revenue stats.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use store::Store;
use store::entities::{Role, Sale};
use common::{Money, OrderId, SaleId};
use domain::SaleStats;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;

#[derive(Deserialize)]
pub struct CreateSaleRequest {
    pub order_id: OrderId,
    pub price_cents: i64,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSaleRequest {
    pub price_cents: i64,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Filter on delivery timestamps instead of creation.
    #[serde(default)]
    pub delivered: bool,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// POST /sales — record a sale against a COMPLETED order.
#[tracing::instrument(skip(state, user, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    user.require(Role::Employee)?;
    let sale = state
        .sales
        .create(req.order_id, Money::from_cents(req.price_cents), req.notes)
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// GET /sales — list, filterable by time window or price range.
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    user.require(Role::Employee)?;
    let sales = if let (Some(from), Some(to)) = (query.from, query.to) {
        if query.delivered {
            state.sales.delivered_between(from, to).await?
        } else {
            state.sales.created_between(from, to).await?
        }
    } else if let (Some(min), Some(max)) = (query.min_price_cents, query.max_price_cents) {
        state
            .sales
            .by_price_range(Money::from_cents(min), Money::from_cents(max))
            .await?
    } else {
        state.sales.list().await?
    };
    Ok(Json(sales))
}

/// GET /sales/stats — count, total and average over a creation window.
pub async fn stats<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<SaleStats>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.sales.stats_between(query.from, query.to).await?))
}

/// GET /sales/:id
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<SaleId>,
) -> Result<Json<Sale>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.sales.get(id).await?))
}

/// PUT /sales/:id — update price and notes.
#[tracing::instrument(skip(state, user, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<SaleId>,
    Json(req): Json<UpdateSaleRequest>,
) -> Result<Json<Sale>, ApiError> {
    user.require(Role::Employee)?;
    let sale = state
        .sales
        .update(id, Money::from_cents(req.price_cents), req.notes)
        .await?;
    Ok(Json(sale))
}

/// POST /sales/:id/delivery — stamp the delivery timestamp, once.
#[tracing::instrument(skip(state, user))]
pub async fn register_delivery<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<SaleId>,
) -> Result<Json<Sale>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.sales.register_delivery(id).await?))
}

/// DELETE /sales/:id
#[tracing::instrument(skip(state, user))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<SaleId>,
) -> Result<StatusCode, ApiError> {
    user.require(Role::Employee)?;
    state.sales.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
