//! Builders wiring driven ports into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use ethaum::domain::ports::{AiGateway, IdentityProvider};
use ethaum::inbound::http::state::{HttpState, HttpStatePorts};
use ethaum::outbound::ai::HttpAiGateway;
use ethaum::outbound::identity::GoTrueIdentityProvider;
use ethaum::outbound::persistence::{
    DbPool, DieselCredibilityRepository, DieselEnterpriseRepository, DieselLaunchRepository,
    DieselMatchRepository, DieselProfileRepository, DieselReviewRepository,
    DieselStartupRepository,
};

use super::ServerConfig;

/// Replace the fixture repositories with Diesel adapters sharing `pool`.
fn with_repositories(ports: HttpStatePorts, pool: &DbPool) -> HttpStatePorts {
    HttpStatePorts {
        profiles: Arc::new(DieselProfileRepository::new(pool.clone(), ports.clock.clone())),
        startups: Arc::new(DieselStartupRepository::new(pool.clone())),
        enterprises: Arc::new(DieselEnterpriseRepository::new(pool.clone())),
        launches: Arc::new(DieselLaunchRepository::new(pool.clone())),
        reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
        matches: Arc::new(DieselMatchRepository::new(pool.clone())),
        credibility: Arc::new(DieselCredibilityRepository::new(pool.clone())),
        ..ports
    }
}

/// Build the ports bundle from configuration.
///
/// Each concern falls back to its fixture independently, so a server with
/// only an identity service configured still runs.
pub(super) fn build_ports(config: &ServerConfig) -> std::io::Result<HttpStatePorts> {
    let mut ports = HttpStatePorts::fixtures();

    if let Some(pool) = &config.db_pool {
        ports = with_repositories(ports, pool);
    } else {
        info!("no database configured; using fixture repositories");
    }

    if let Some(identity) = &config.identity {
        let provider = GoTrueIdentityProvider::new(
            identity.url.clone(),
            identity.anon_key.clone(),
            identity.timeout,
        )
        .map_err(|e| std::io::Error::other(format!("identity client: {e}")))?;
        ports.identity = Arc::new(provider) as Arc<dyn IdentityProvider>;
    } else {
        info!("no identity service configured; using fixture identity provider");
    }

    if let Some((base_url, timeout)) = &config.ai {
        let gateway = HttpAiGateway::new(base_url.clone(), *timeout)
            .map_err(|e| std::io::Error::other(format!("AI client: {e}")))?;
        ports.ai = Arc::new(gateway) as Arc<dyn AiGateway>;
    } else {
        info!("no AI endpoint configured; AI features serve demo payloads");
    }

    Ok(ports)
}

pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    build_ports(config).map(|ports| web::Data::new(HttpState::new(ports)))
}
