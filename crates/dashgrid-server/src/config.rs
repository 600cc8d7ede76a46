//! Environment-variable configuration for the server binary.

use std::env;
use std::fs;

use dashgrid_auth::AuthConfig;
use dashgrid_db::DbConfig;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Build the database configuration from `DASHGRID_DB_*` variables,
/// falling back to local-development defaults.
pub fn db_config_from_env() -> DbConfig {
    let defaults = DbConfig::default();
    DbConfig {
        url: env_or("DASHGRID_DB_URL", &defaults.url),
        namespace: env_or("DASHGRID_DB_NAMESPACE", &defaults.namespace),
        database: env_or("DASHGRID_DB_DATABASE", &defaults.database),
        username: env_or("DASHGRID_DB_USERNAME", &defaults.username),
        password: env_or("DASHGRID_DB_PASSWORD", &defaults.password),
    }
}

/// Build the auth configuration from `DASHGRID_JWT_*` variables.
///
/// The signing key pair is read from PEM files named by
/// `DASHGRID_JWT_PRIVATE_KEY_PATH` / `DASHGRID_JWT_PUBLIC_KEY_PATH`.
pub fn auth_config_from_env() -> Result<AuthConfig, std::io::Error> {
    let defaults = AuthConfig::default();

    let private_key_path = env_or("DASHGRID_JWT_PRIVATE_KEY_PATH", "keys/jwt_ed25519.pem");
    let public_key_path = env_or("DASHGRID_JWT_PUBLIC_KEY_PATH", "keys/jwt_ed25519.pub.pem");

    let access_lifetime = env::var("DASHGRID_JWT_ACCESS_LIFETIME_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.access_token_lifetime_secs);
    let refresh_lifetime = env::var("DASHGRID_JWT_REFRESH_LIFETIME_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.refresh_token_lifetime_secs);

    Ok(AuthConfig {
        jwt_private_key_pem: fs::read_to_string(private_key_path)?,
        jwt_public_key_pem: fs::read_to_string(public_key_path)?,
        access_token_lifetime_secs: access_lifetime,
        refresh_token_lifetime_secs: refresh_lifetime,
        jwt_issuer: env_or("DASHGRID_JWT_ISSUER", &defaults.jwt_issuer),
    })
}
