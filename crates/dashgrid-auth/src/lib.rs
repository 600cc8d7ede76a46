//! DASHGRID Auth — thin JWT issuance (tenant/subtenant code pair to
//! numeric IDs) and opaque refresh-token rotation.

pub mod config;
pub mod error;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, TokenPair};
pub use token::AccessTokenClaims;
