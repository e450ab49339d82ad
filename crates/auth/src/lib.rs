//! Authentication and user management: argon2 password hashing, JWT
//! access tokens and the user service the API layer guards requests with.

mod error;
pub mod password;
mod service;
pub mod token;

pub use error::AuthError;
pub use service::{AuthService, LoginOutcome, NewUser};
pub use token::{Claims, TokenService};
