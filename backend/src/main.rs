//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ethaum::inbound::http::health::HealthState;
use ethaum::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server, key_fingerprint};

fn io_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

async fn server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let key = settings
        .session_key(!cfg!(debug_assertions))
        .map_err(io_error)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    let bind_addr = settings.bind_addr().map_err(io_error)?;
    let mut config = ServerConfig::new(key, settings.cookie_secure, SameSite::Lax, bind_addr);

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            run_pending_migrations(database_url).await.map_err(io_error)?;
        }
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(io_error)?;
        config = config.with_db_pool(pool);
    }
    if let Some(identity) = settings.identity().map_err(io_error)? {
        config = config.with_identity(identity);
    }
    if let Some((base_url, timeout)) = settings.ai().map_err(io_error)? {
        config = config.with_ai(base_url, timeout);
    }
    Ok(config)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(io_error)?;
    let config = server_config(&settings).await?;
    info!(addr = %config.bind_addr, "starting server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
