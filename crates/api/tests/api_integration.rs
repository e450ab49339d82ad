//! Integration tests for the API server.

use std::sync::OnceLock;

use auth::TokenService;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use store::MemoryStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (Router, String) {
    let store = MemoryStore::new();
    let tokens = TokenService::new(b"test-secret", 3_600);
    let state = api::create_state(store, tokens);
    api::bootstrap_admin(&state, "admin", "admin-password")
        .await
        .unwrap();
    let app = api::create_app(state, get_metrics_handle());

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": "admin", "password": "admin-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    (app, token)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => Body::from(serde_json::to_string(&json).unwrap()),
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_client(app: &Router, token: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/clients",
        Some(token),
        Some(serde_json::json!({
            "name": "Ana",
            "surname": "Pérez",
            "email": email,
            "address": "Av. Siempreviva 742"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, token: &str, stock: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/products",
        Some(token),
        Some(serde_json::json!({
            "name": "Chair",
            "price_cents": 2500,
            "description": "wooden chair",
            "stock": stock
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "mantis");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _) = setup().await;
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "auth_failure");
}

#[tokio::test]
async fn test_requests_require_bearer_token() {
    let (app, _) = setup().await;
    let (status, _) = send(&app, "GET", "/clients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/clients", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_me() {
    let (app, token) = setup().await;
    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["roles"][0], "ADMIN");
}

#[tokio::test]
async fn test_client_crud_and_duplicate_email() {
    let (app, token) = setup().await;
    let id = create_client(&app, &token, "ana@example.com").await;

    let (status, body) = send(&app, "GET", &format!("/clients/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["active"], true);

    // Duplicate email conflicts.
    let (status, body) = send(
        &app,
        "POST",
        "/clients",
        Some(&token),
        Some(serde_json::json!({
            "name": "Bea",
            "surname": "Ruiz",
            "email": "ana@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    // Logical deletion flips the flag.
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/clients/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn test_unknown_client_is_404() {
    let (app, token) = setup().await;
    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/clients/{missing}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_order_workflow_with_stock_and_sale() {
    let (app, token) = setup().await;
    let client_id = create_client(&app, &token, "ana@example.com").await;
    let product_id = create_product(&app, &token, 10).await;

    let (status, order) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 3 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "PENDING");
    let order_id = order["id"].as_str().unwrap().to_string();

    // Total at current prices.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/orders/{order_id}/total"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_cents"], 7500);

    // PENDING cannot jump straight to COMPLETED.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(&token),
        Some(serde_json::json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");

    // Walk the lifecycle; stock drops only at completion.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(&token),
        Some(serde_json::json!({ "status": "IN_PROCESS" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, product) = send(
        &app,
        "GET",
        &format!("/products/{product_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(product["stock"], 10);

    let (status, order) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(&token),
        Some(serde_json::json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "COMPLETED");

    let (_, product) = send(
        &app,
        "GET",
        &format!("/products/{product_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(product["stock"], 7);

    // Record the sale and its delivery.
    let (status, sale) = send(
        &app,
        "POST",
        "/sales",
        Some(&token),
        Some(serde_json::json!({ "order_id": order_id, "price_cents": 7500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let sale_id = sale["id"].as_str().unwrap().to_string();
    assert!(sale["delivered_at"].is_null());

    let (status, sale) = send(
        &app,
        "POST",
        &format!("/sales/{sale_id}/delivery"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!sale["delivered_at"].is_null());

    // One sale per order.
    let (status, body) = send(
        &app,
        "POST",
        "/sales",
        Some(&token),
        Some(serde_json::json!({ "order_id": order_id, "price_cents": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn test_order_creation_rejects_insufficient_stock() {
    let (app, token) = setup().await;
    let client_id = create_client(&app, &token, "ana@example.com").await;
    let product_id = create_product(&app, &token, 2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 5 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "insufficient_stock");

    // Nothing was created and nothing was reserved.
    let (_, orders) = send(&app, "GET", "/orders", Some(&token), None).await;
    assert_eq!(orders.as_array().unwrap().len(), 0);
    let (_, product) = send(
        &app,
        "GET",
        &format!("/products/{product_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(product["stock"], 2);
}

#[tokio::test]
async fn test_completion_with_insufficient_stock_conflicts() {
    let (app, token) = setup().await;
    let client_id = create_client(&app, &token, "ana@example.com").await;
    let product_id = create_product(&app, &token, 5).await;

    let (status, order) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 5 }],
            "status": "IN_PROCESS"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_str().unwrap();

    // Stock drops below the order's quantity while it is open.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/products/{product_id}/stock"),
        Some(&token),
        Some(serde_json::json!({ "value": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(&token),
        Some(serde_json::json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "insufficient_stock");

    // Untouched: stock and status both keep their values.
    let (_, product) = send(
        &app,
        "GET",
        &format!("/products/{product_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(product["stock"], 2);
    let (_, order) = send(&app, "GET", &format!("/orders/{order_id}"), Some(&token), None).await;
    assert_eq!(order["status"], "IN_PROCESS");
}

#[tokio::test]
async fn test_sale_requires_completed_order() {
    let (app, token) = setup().await;
    let client_id = create_client(&app, &token, "ana@example.com").await;
    let product_id = create_product(&app, &token, 10).await;

    let (_, order) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/sales",
        Some(&token),
        Some(serde_json::json!({ "order_id": order_id, "price_cents": 2500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_state");
}

#[tokio::test]
async fn test_terminal_initial_status_rejected() {
    let (app, token) = setup().await;
    let client_id = create_client(&app, &token, "ana@example.com").await;
    let product_id = create_product(&app, &token, 10).await;

    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 1 }],
            "status": "COMPLETED"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");
}

#[tokio::test]
async fn test_employee_cannot_manage_users() {
    let (app, admin_token) = setup().await;

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(&admin_token),
        Some(serde_json::json!({
            "username": "worker",
            "password": "workerpass",
            "roles": ["EMPLOYEE"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, login) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": "worker", "password": "workerpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let worker_token = login["token"].as_str().unwrap();

    // Employees can use business endpoints but not user management.
    let (status, _) = send(&app, "GET", "/clients", Some(worker_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/users", Some(worker_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");
}

#[tokio::test]
async fn test_deactivated_user_token_is_rejected() {
    let (app, admin_token) = setup().await;

    let (_, created) = send(
        &app,
        "POST",
        "/users",
        Some(&admin_token),
        Some(serde_json::json!({
            "username": "worker",
            "password": "workerpass",
            "roles": ["EMPLOYEE"]
        })),
    )
    .await;
    let user_id = created["id"].as_str().unwrap().to_string();

    let (_, login) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": "worker", "password": "workerpass" })),
    )
    .await;
    let worker_token = login["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{user_id}/active"),
        Some(&admin_token),
        Some(serde_json::json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/clients", Some(&worker_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pending_order_delete_and_terminal_protection() {
    let (app, token) = setup().await;
    let client_id = create_client(&app, &token, "ana@example.com").await;
    let product_id = create_product(&app, &token, 10).await;

    let (_, order) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // A cancelled order cannot be deleted.
    let (_, order) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(serde_json::json!({
            "client_id": client_id,
            "lines": [{ "product_id": product_id, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();
    send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(&token),
        Some(serde_json::json!({ "status": "CANCELLED" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_state");
}
