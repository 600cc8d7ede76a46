//! Authentication service — code-pair login and refresh rotation.

use chrono::{Duration, Utc};
use dashgrid_core::error::{DashgridError, DashgridResult};
use dashgrid_core::models::session::CreateSession;
use dashgrid_core::repository::{SessionRepository, TenantRepository};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// Successful login or refresh result.
#[derive(Debug)]
pub struct TokenPair {
    /// Signed JWT access token.
    pub access_token: String,
    /// Raw opaque refresh token (return to client, not stored).
    pub refresh_token: String,
    /// Session ID (can be used for logout).
    pub session_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<T: TenantRepository, S: SessionRepository> {
    tenant_repo: T,
    session_repo: S,
    config: AuthConfig,
}

impl<T: TenantRepository, S: SessionRepository> AuthService<T, S> {
    pub fn new(tenant_repo: T, session_repo: S, config: AuthConfig) -> Self {
        Self {
            tenant_repo,
            session_repo,
            config,
        }
    }

    async fn issue_pair(&self, tenant_id: i64, subtenant_id: i64) -> DashgridResult<TokenPair> {
        let raw_refresh = token::generate_refresh_token();
        let token_hash = token::hash_refresh_token(&raw_refresh);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.refresh_token_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                tenant_id,
                subtenant_id,
                token_hash,
                expires_at,
            })
            .await?;

        let access_token = token::issue_access_token(tenant_id, subtenant_id, &self.config)?;

        Ok(TokenPair {
            access_token,
            refresh_token: raw_refresh,
            session_id: session.id,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Resolve a tenant/subtenant code pair to numeric IDs and issue a
    /// token pair. Unknown codes map to a uniform error so the login
    /// surface leaks nothing about which code was wrong.
    pub async fn login(
        &self,
        tenant_code: &str,
        subtenant_code: &str,
    ) -> DashgridResult<TokenPair> {
        let (tenant, subtenant) = self
            .tenant_repo
            .get_by_codes(tenant_code, subtenant_code)
            .await
            .map_err(|e| match e {
                DashgridError::NotFound { .. } => AuthError::UnknownTenant.into(),
                other => other,
            })?;

        self.issue_pair(tenant.id, subtenant.id).await
    }

    /// Rotate a refresh token: consume the old one and issue a new
    /// token pair.
    ///
    /// Each refresh token is single-use — the old session is
    /// invalidated before the new one is created.
    pub async fn refresh(&self, raw_refresh_token: &str) -> DashgridResult<TokenPair> {
        let token_hash = token::hash_refresh_token(raw_refresh_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                DashgridError::NotFound { .. } => {
                    AuthError::TokenInvalid("refresh token not found or already used".into())
                        .into()
                }
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            // Invalidate the expired session and reject.
            let _ = self.session_repo.invalidate(session.id).await;
            return Err(AuthError::TokenExpired.into());
        }

        // Invalidate old session (single-use guarantee).
        self.session_repo.invalidate(session.id).await?;

        self.issue_pair(session.tenant_id, session.subtenant_id)
            .await
    }

    /// Invalidate a single session (logout).
    pub async fn logout(&self, session_id: Uuid) -> DashgridResult<()> {
        self.session_repo.invalidate(session_id).await
    }
}
