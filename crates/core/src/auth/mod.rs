//! Single-admin authentication: credential check and bearer tokens.

pub mod password;
pub mod token;

use thiserror::Error;

pub use password::{hash_password, verify_admin};
pub use token::{issue_token, verify_token, Claims};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("failed to hash password: {0}")]
    Hashing(String),
}
