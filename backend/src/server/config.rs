//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ethaum::outbound::persistence::DbPool;
use url::Url;

use super::settings::IdentitySettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Option<IdentitySettings>,
    pub(crate) ai: Option<(Url, Duration)>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            identity: None,
            ai: None,
        }
    }

    /// Attach a database pool; repositories become Diesel-backed.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use the remote identity service instead of the fixture provider.
    #[must_use]
    pub fn with_identity(mut self, identity: IdentitySettings) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Forward AI features to `base_url` instead of serving demo payloads.
    #[must_use]
    pub fn with_ai(mut self, base_url: Url, timeout: Duration) -> Self {
        self.ai = Some((base_url, timeout));
        self
    }
}
