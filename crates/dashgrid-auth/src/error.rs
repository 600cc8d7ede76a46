//! Authentication error types.

use dashgrid_core::error::DashgridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown tenant or subtenant code")]
    UnknownTenant,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for DashgridError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownTenant
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => DashgridError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => DashgridError::Crypto(msg),
        }
    }
}
