use store::StoreError;
use thiserror::Error;

/// Errors raised by the authentication layer.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username, wrong password, or a deactivated account. One
    /// variant for all three so responses never reveal which part failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer token failed signature or shape validation.
    #[error("invalid token")]
    TokenInvalid,

    /// The bearer token's expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// The requested username is already registered.
    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    /// Password hashing or verification failed internally.
    #[error("password hashing failed")]
    Hash,
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => AuthError::NotFound(id.to_string()),
            StoreError::Duplicate { value, .. } => AuthError::UsernameTaken(value),
            other => AuthError::InvalidArgument(other.to_string()),
        }
    }
}
