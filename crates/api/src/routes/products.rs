//! Product catalog and stock endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use store::Store;
use store::entities::{Product, Role};
use common::{Money, ProductId, RawMaterialId};
use domain::NewProduct;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub material_ids: Vec<RawMaterialId>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub only_active: bool,
    pub search: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct ThresholdQuery {
    pub threshold: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub quantity: i64,
}

impl From<ProductRequest> for NewProduct {
    fn from(req: ProductRequest) -> Self {
        NewProduct {
            name: req.name,
            price: Money::from_cents(req.price_cents),
            description: req.description,
            stock: req.stock,
            material_ids: req.material_ids,
        }
    }
}

/// POST /products
#[tracing::instrument(skip(state, user, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    user.require(Role::Employee)?;
    let product = state.products.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products — list with optional search or price-range filters.
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    user.require(Role::Employee)?;
    let products = if let Some(needle) = query.search {
        state.products.search(&needle).await?
    } else if let (Some(min), Some(max)) = (query.min_price_cents, query.max_price_cents) {
        state
            .products
            .by_price_range(Money::from_cents(min), Money::from_cents(max))
            .await?
    } else {
        state.products.list(query.only_active).await?
    };
    Ok(Json(products))
}

/// GET /products/low-stock?threshold=N
pub async fn low_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ThresholdQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.low_stock(query.threshold).await?))
}

/// GET /products/out-of-stock
pub async fn out_of_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<Vec<Product>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.out_of_stock().await?))
}

/// GET /products/:id
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.get(id).await?))
}

/// PUT /products/:id
#[tracing::instrument(skip(state, user, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ProductId>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.update(id, req.into()).await?))
}

/// DELETE /products/:id — logical deletion.
pub async fn deactivate<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.deactivate(id).await?))
}

/// PUT /products/:id/stock — overwrite the stock level.
#[tracing::instrument(skip(state, user))]
pub async fn set_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ProductId>,
    Json(req): Json<SetStockRequest>,
) -> Result<Json<Product>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.set_stock(id, req.value).await?))
}

/// POST /products/:id/stock/increment
#[tracing::instrument(skip(state, user))]
pub async fn increment_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ProductId>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<Product>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.increment_stock(id, req.quantity).await?))
}

/// POST /products/:id/stock/decrement — conditional, never below zero.
#[tracing::instrument(skip(state, user))]
pub async fn decrement_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<ProductId>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<Product>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.decrement_stock(id, req.quantity).await?))
}
