//! User management and the login flow.

use store::UserStore;
use store::entities::{Role, User};
use common::UserId;

use crate::token::TokenService;
use crate::{AuthError, password};

/// Input for registering a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<Role>,
}

/// The result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
    pub roles: Vec<Role>,
}

/// Authentication service over a user store.
#[derive(Clone)]
pub struct AuthService<S> {
    store: S,
    tokens: TokenService,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Checks a username/password pair and issues an access token.
    ///
    /// Unknown usernames, wrong passwords and deactivated accounts all
    /// fail with the same `InvalidCredentials`.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.active || !password::verify_password(password, &user.password_hash)? {
            tracing::warn!(username, "failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(username, "user logged in");
        Ok(LoginOutcome {
            token,
            username: user.username,
            roles: user.roles,
        })
    }

    /// Resolves a bearer token back to its live user record. Tokens of
    /// since-deactivated or deleted users are rejected.
    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;
        let user = self
            .store
            .get_user(claims.sub)
            .await
            .map_err(|_| AuthError::TokenInvalid)?;
        if !user.active {
            return Err(AuthError::TokenInvalid);
        }
        Ok(user)
    }

    /// Registers a user account with a hashed password.
    #[tracing::instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: NewUser) -> Result<User, AuthError> {
        if input.username.trim().is_empty() {
            return Err(AuthError::InvalidArgument("username must not be blank".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::InvalidArgument(
                "password must be at least 8 characters".into(),
            ));
        }
        if input.roles.is_empty() {
            return Err(AuthError::InvalidArgument(
                "a user needs at least one role".into(),
            ));
        }

        let hash = password::hash_password(&input.password)?;
        Ok(self
            .store
            .insert_user(User::new(input.username, hash, input.roles))
            .await?)
    }

    /// Activates or deactivates an account. Deactivation invalidates the
    /// account's outstanding tokens via the live lookup in
    /// [`AuthService::current_user`].
    pub async fn set_active(&self, id: UserId, active: bool) -> Result<User, AuthError> {
        let mut user = self.store.get_user(id).await?;
        user.active = active;
        Ok(self.store.update_user(user).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn service() -> AuthService<MemoryStore> {
        AuthService::new(MemoryStore::new(), TokenService::new(b"test-secret", 3_600))
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: "correct horse".into(),
            roles: vec![Role::Employee],
        }
    }

    #[tokio::test]
    async fn login_roundtrip() {
        let service = service();
        service.create_user(new_user("ana")).await.unwrap();

        let outcome = service.authenticate("ana", "correct horse").await.unwrap();
        assert_eq!(outcome.username, "ana");

        let user = service.current_user(&outcome.token).await.unwrap();
        assert_eq!(user.username, "ana");
        assert!(user.has_role(Role::Employee));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_identical() {
        let service = service();
        service.create_user(new_user("ana")).await.unwrap();

        let wrong = service.authenticate("ana", "nope").await.unwrap_err();
        let unknown = service.authenticate("ghost", "nope").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn deactivation_blocks_login_and_existing_tokens() {
        let service = service();
        let user = service.create_user(new_user("ana")).await.unwrap();
        let outcome = service.authenticate("ana", "correct horse").await.unwrap();

        service.set_active(user.id, false).await.unwrap();

        assert!(matches!(
            service.authenticate("ana", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.current_user(&outcome.token).await,
            Err(AuthError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let service = service();
        service.create_user(new_user("ana")).await.unwrap();
        assert!(matches!(
            service.create_user(new_user("Ana")).await,
            Err(AuthError::UsernameTaken(_))
        ));
    }

    #[tokio::test]
    async fn weak_inputs_are_rejected() {
        let service = service();
        let mut input = new_user("ana");
        input.password = "short".into();
        assert!(matches!(
            service.create_user(input).await,
            Err(AuthError::InvalidArgument(_))
        ));

        let mut input = new_user(" ");
        input.username = " ".into();
        assert!(matches!(
            service.create_user(input).await,
            Err(AuthError::InvalidArgument(_))
        ));

        let mut input = new_user("ana");
        input.roles.clear();
        assert!(matches!(
            service.create_user(input).await,
            Err(AuthError::InvalidArgument(_))
        ));
    }
}
