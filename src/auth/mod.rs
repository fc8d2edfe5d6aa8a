pub mod jwt;

use thiserror::Error;

use crate::extractors::CurrentUser;

pub use jwt::JwtAuthenticator;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Turns a request credential into the caller's identity.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError>;
}
