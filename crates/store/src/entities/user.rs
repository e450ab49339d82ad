use common::UserId;
use serde::{Deserialize, Serialize};

/// Access role attached to a user account.
///
/// Roles form a small fixed permission set checked by the API layer:
/// `Admin` permits everything, `Employee` permits employee-level access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Returns true if a holder of `self` may act at the `required` level.
    pub fn permits(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Employee => required == Role::Employee,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A backend user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique across all users.
    pub username: String,
    /// Argon2 PHC string, never the plain password.
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub active: bool,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: String, roles: Vec<Role>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash,
            roles,
            active: true,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if any held role permits acting at the required level.
    pub fn permits(&self, required: Role) -> bool {
        self.roles.iter().any(|r| r.permits(required))
    }
}
