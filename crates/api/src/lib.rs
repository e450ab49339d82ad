//! HTTP API server for the mantis small-business backend.
//!
//! REST endpoints for clients, catalog, orders and sales, guarded by JWT
//! bearer auth, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use auth::{AuthError, AuthService, NewUser, TokenService};
use axum::Router;
use axum::routing::{delete, get, post, put};
use domain::{
    ClientService, DocumentService, OrderService, PhoneService, ProductService, RawMaterialService,
    SaleService, SocialAccountService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use store::entities::Role;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub clients: ClientService<S>,
    pub phones: PhoneService<S>,
    pub socials: SocialAccountService<S>,
    pub documents: DocumentService<S>,
    pub products: ProductService<S>,
    pub materials: RawMaterialService<S>,
    pub orders: OrderService<S>,
    pub sales: SaleService<S>,
    pub auth: AuthService<S>,
}

/// Builds the application state by wiring every service to the store.
pub fn create_state<S: Store + Clone + 'static>(
    store: S,
    tokens: TokenService,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        clients: ClientService::new(store.clone()),
        phones: PhoneService::new(store.clone()),
        socials: SocialAccountService::new(store.clone()),
        documents: DocumentService::new(store.clone()),
        products: ProductService::new(store.clone()),
        materials: RawMaterialService::new(store.clone()),
        orders: OrderService::new(store.clone()),
        sales: SaleService::new(store.clone()),
        auth: AuthService::new(store, tokens),
    })
}

/// Creates the bootstrap admin account when no users exist yet, so a fresh
/// deployment is reachable.
pub async fn bootstrap_admin<S: Store + Clone + 'static>(
    state: &AppState<S>,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    if !state.auth.list_users().await?.is_empty() {
        return Ok(());
    }
    state
        .auth
        .create_user(NewUser {
            username: username.to_string(),
            password: password.to_string(),
            roles: vec![Role::Admin],
        })
        .await?;
    tracing::info!(username, "bootstrap admin account created");
    Ok(())
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health))
        .route("/auth/login", post(routes::auth::login::<S>))
        .route("/auth/me", get(routes::auth::me))
        // Clients and their contact sub-resources
        .route("/clients", post(routes::clients::create::<S>))
        .route("/clients", get(routes::clients::list::<S>))
        .route("/clients/by-email", get(routes::clients::by_email::<S>))
        .route("/clients/by-document", get(routes::clients::by_document::<S>))
        .route("/clients/{id}", get(routes::clients::get::<S>))
        .route("/clients/{id}", put(routes::clients::update::<S>))
        .route("/clients/{id}", delete(routes::clients::deactivate::<S>))
        .route("/clients/{id}/phones", get(routes::clients::phones::<S>))
        .route("/clients/{id}/phones", post(routes::clients::add_phone::<S>))
        .route(
            "/clients/{id}/social-accounts",
            get(routes::clients::social_accounts::<S>),
        )
        .route(
            "/clients/{id}/social-accounts",
            post(routes::clients::add_social_account::<S>),
        )
        .route("/clients/{id}/documents", get(routes::clients::documents::<S>))
        .route(
            "/clients/{id}/documents",
            post(routes::clients::add_document::<S>),
        )
        .route("/clients/{id}/orders", get(routes::clients::orders::<S>))
        .route("/clients/{id}/sales", get(routes::clients::sales::<S>))
        // Standalone contact endpoints
        .route("/phones", get(routes::contacts::search_phones::<S>))
        .route("/phones/{id}", put(routes::contacts::update_phone::<S>))
        .route("/phones/{id}", delete(routes::contacts::deactivate_phone::<S>))
        .route(
            "/social-accounts",
            get(routes::contacts::socials_by_network::<S>),
        )
        .route(
            "/social-accounts/{id}",
            put(routes::contacts::update_social::<S>),
        )
        .route(
            "/social-accounts/{id}",
            delete(routes::contacts::deactivate_social::<S>),
        )
        .route("/documents/{id}", put(routes::contacts::update_document::<S>))
        .route(
            "/documents/{id}",
            delete(routes::contacts::deactivate_document::<S>),
        )
        // Products
        .route("/products", post(routes::products::create::<S>))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/low-stock", get(routes::products::low_stock::<S>))
        .route(
            "/products/out-of-stock",
            get(routes::products::out_of_stock::<S>),
        )
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}", put(routes::products::update::<S>))
        .route("/products/{id}", delete(routes::products::deactivate::<S>))
        .route("/products/{id}/stock", put(routes::products::set_stock::<S>))
        .route(
            "/products/{id}/stock/increment",
            post(routes::products::increment_stock::<S>),
        )
        .route(
            "/products/{id}/stock/decrement",
            post(routes::products::decrement_stock::<S>),
        )
        // Raw materials
        .route("/raw-materials", post(routes::raw_materials::create::<S>))
        .route("/raw-materials", get(routes::raw_materials::list::<S>))
        .route(
            "/raw-materials/low-stock",
            get(routes::raw_materials::low_stock::<S>),
        )
        .route(
            "/raw-materials/out-of-stock",
            get(routes::raw_materials::out_of_stock::<S>),
        )
        .route("/raw-materials/{id}", get(routes::raw_materials::get::<S>))
        .route("/raw-materials/{id}", put(routes::raw_materials::update::<S>))
        .route(
            "/raw-materials/{id}",
            delete(routes::raw_materials::deactivate::<S>),
        )
        .route(
            "/raw-materials/{id}/products",
            get(routes::raw_materials::products::<S>),
        )
        .route(
            "/raw-materials/{id}/stock",
            put(routes::raw_materials::set_stock::<S>),
        )
        .route(
            "/raw-materials/{id}/stock/increment",
            post(routes::raw_materials::increment_stock::<S>),
        )
        .route(
            "/raw-materials/{id}/stock/decrement",
            post(routes::raw_materials::decrement_stock::<S>),
        )
        // Orders
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}", put(routes::orders::update::<S>))
        .route("/orders/{id}", delete(routes::orders::delete::<S>))
        .route("/orders/{id}/status", post(routes::orders::transition::<S>))
        .route("/orders/{id}/total", get(routes::orders::total::<S>))
        .route("/orders/{id}/sale", get(routes::orders::sale::<S>))
        // Sales
        .route("/sales", post(routes::sales::create::<S>))
        .route("/sales", get(routes::sales::list::<S>))
        .route("/sales/stats", get(routes::sales::stats::<S>))
        .route("/sales/{id}", get(routes::sales::get::<S>))
        .route("/sales/{id}", put(routes::sales::update::<S>))
        .route("/sales/{id}", delete(routes::sales::delete::<S>))
        .route(
            "/sales/{id}/delivery",
            post(routes::sales::register_delivery::<S>),
        )
        // Users (admin)
        .route("/users", post(routes::users::create::<S>))
        .route("/users", get(routes::users::list::<S>))
        .route("/users/{id}/active", put(routes::users::set_active::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
