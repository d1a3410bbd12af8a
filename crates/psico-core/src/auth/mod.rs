//! Password hashing and session tokens for therapist accounts.

mod password;
mod token;

pub use password::*;
pub use token::*;

use thiserror::Error;

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid hashing parameters: {0}")]
    Params(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,
}

pub type AuthResult<T> = Result<T, AuthError>;
