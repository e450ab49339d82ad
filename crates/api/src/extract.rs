//! Bearer-token authentication extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use store::Store;
use store::entities::{Role, User};

use crate::AppState;
use crate::error::ApiError;

/// The authenticated user behind the request's bearer token.
///
/// Extraction fails with 401 when the header is missing or the token does
/// not resolve to an active user.
pub struct AuthUser(pub User);

impl AuthUser {
    /// Guards a handler body: 403 unless the user can act at `required`.
    pub fn require(&self, required: Role) -> Result<(), ApiError> {
        if self.0.permits(required) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl<S: Store + Clone + 'static> FromRequestParts<Arc<AppState<S>>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Auth(auth::AuthError::TokenInvalid))?;

        let user = state.auth.current_user(token).await?;
        Ok(AuthUser(user))
    }
}
