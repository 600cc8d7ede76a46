//! DASHGRID Server — Application entry point.

mod config;

use std::time::Duration;

use dashgrid_core::repository::SessionRepository;
use dashgrid_db::repository::SurrealSessionRepository;
use tracing_subscriber::EnvFilter;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::from_default_env().add_directive("dashgrid=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    tracing::info!("Starting DASHGRID server...");

    let db_config = config::db_config_from_env();
    let auth_config = config::auth_config_from_env()?;

    let manager = dashgrid_db::DbManager::connect(&db_config).await?;
    dashgrid_db::run_migrations(manager.client()).await?;

    // Periodic sweep of expired refresh-token sessions.
    let sessions = SurrealSessionRepository::new(manager.client().clone());
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            match sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Expired sessions removed"),
                Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
            }
        }
    });

    tracing::info!(issuer = %auth_config.jwt_issuer, "DASHGRID server ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("DASHGRID server stopped.");

    Ok(())
}
