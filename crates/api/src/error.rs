//! API error types with HTTP response mapping.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
///
/// Every response body carries `{ "error": ..., "kind": ... }`, where
/// `kind` is a stable snake_case label callers can branch on.
#[derive(Debug)]
pub enum ApiError {
    /// Domain logic error.
    Domain(DomainError),
    /// Authentication failure.
    Auth(AuthError),
    /// Authenticated but lacking the required role.
    Forbidden,
    /// Bad request from the client.
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Auth(err) => auth_error_to_response(err),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "insufficient role for this operation".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_argument", msg),
        };

        let body = serde_json::json!({ "error": message, "kind": kind });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, &'static str, String) {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        // State, transition, stock and uniqueness failures are all
        // conflicts with the current state of the resource.
        DomainError::InvalidState(_)
        | DomainError::InvalidTransition { .. }
        | DomainError::InsufficientStock { .. }
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
    };
    (status, err.kind(), err.to_string())
}

fn auth_error_to_response(err: AuthError) -> (StatusCode, &'static str, String) {
    let (status, kind) = match &err {
        AuthError::InvalidCredentials | AuthError::TokenInvalid | AuthError::TokenExpired => {
            (StatusCode::UNAUTHORIZED, "auth_failure")
        }
        AuthError::UsernameTaken(_) => (StatusCode::CONFLICT, "conflict"),
        AuthError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        AuthError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
        AuthError::Hash => {
            tracing::error!("password hashing failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    };
    (status, kind, err.to_string())
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}
