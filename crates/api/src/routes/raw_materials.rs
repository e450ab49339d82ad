//! Raw-material catalog and stock endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use store::Store;
use store::entities::{Product, RawMaterial, Role};
use common::{Money, RawMaterialId};
use domain::NewRawMaterial;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::routes::products::{AdjustStockRequest, ListQuery, SetStockRequest, ThresholdQuery};

#[derive(Deserialize)]
pub struct RawMaterialRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub unit: String,
}

impl From<RawMaterialRequest> for NewRawMaterial {
    fn from(req: RawMaterialRequest) -> Self {
        NewRawMaterial {
            name: req.name,
            description: req.description,
            price: Money::from_cents(req.price_cents),
            stock: req.stock,
            unit: req.unit,
        }
    }
}

/// POST /raw-materials
#[tracing::instrument(skip(state, user, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<RawMaterialRequest>,
) -> Result<(StatusCode, Json<RawMaterial>), ApiError> {
    user.require(Role::Employee)?;
    let material = state.materials.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /raw-materials
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RawMaterial>>, ApiError> {
    user.require(Role::Employee)?;
    let materials = if let Some(needle) = query.search {
        state.materials.search(&needle).await?
    } else if let (Some(min), Some(max)) = (query.min_price_cents, query.max_price_cents) {
        state
            .materials
            .by_price_range(Money::from_cents(min), Money::from_cents(max))
            .await?
    } else {
        state.materials.list(query.only_active).await?
    };
    Ok(Json(materials))
}

/// GET /raw-materials/low-stock?threshold=N
pub async fn low_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Query(query): Query<ThresholdQuery>,
) -> Result<Json<Vec<RawMaterial>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.low_stock(query.threshold).await?))
}

/// GET /raw-materials/out-of-stock
pub async fn out_of_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<Vec<RawMaterial>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.out_of_stock().await?))
}

/// GET /raw-materials/:id
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
) -> Result<Json<RawMaterial>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.get(id).await?))
}

/// GET /raw-materials/:id/products — products built from this material.
pub async fn products<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
) -> Result<Json<Vec<Product>>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.products.by_material(id).await?))
}

/// PUT /raw-materials/:id
#[tracing::instrument(skip(state, user, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
    Json(req): Json<RawMaterialRequest>,
) -> Result<Json<RawMaterial>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.update(id, req.into()).await?))
}

/// DELETE /raw-materials/:id — logical deletion.
pub async fn deactivate<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
) -> Result<Json<RawMaterial>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.deactivate(id).await?))
}

/// PUT /raw-materials/:id/stock
pub async fn set_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
    Json(req): Json<SetStockRequest>,
) -> Result<Json<RawMaterial>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.set_stock(id, req.value).await?))
}

/// POST /raw-materials/:id/stock/increment
pub async fn increment_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<RawMaterial>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.increment_stock(id, req.quantity).await?))
}

/// POST /raw-materials/:id/stock/decrement
pub async fn decrement_stock<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(id): Path<RawMaterialId>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<RawMaterial>, ApiError> {
    user.require(Role::Employee)?;
    Ok(Json(state.materials.decrement_stock(id, req.quantity).await?))
}
