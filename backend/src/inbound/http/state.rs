//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data`. It owns the
//! domain services and the ports a per-request session synchronizer needs,
//! so handlers stay free of I/O wiring and remain testable with fixtures
//! or mocks.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AiGateway, CredibilityRepository, EnterpriseRepository, FixtureAiGateway,
    FixtureCredibilityRepository, FixtureEnterpriseRepository, FixtureIdentityProvider,
    FixtureLaunchRepository, FixtureMatchRepository, FixtureProfileRepository,
    FixtureReviewRepository, FixtureStartupRepository, IdentityProvider, LaunchRepository,
    MatchRepository, ProfileRepository, RecordingNavigator, ReviewRepository, SessionCache,
    StartupRepository,
};
use crate::domain::{
    AiAssistant, CredibilityService, EnterpriseService, Error, LaunchService, MatchService,
    ProfileService, ReviewService, SearchService, SessionPorts, SessionSynchronizer,
    StartupService, UserProfile,
};
use crate::inbound::http::session::SessionContext;

/// Parameter object bundling every driven port the HTTP adapter uses.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub startups: Arc<dyn StartupRepository>,
    pub enterprises: Arc<dyn EnterpriseRepository>,
    pub launches: Arc<dyn LaunchRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub matches: Arc<dyn MatchRepository>,
    pub credibility: Arc<dyn CredibilityRepository>,
    pub ai: Arc<dyn AiGateway>,
    pub clock: Arc<dyn Clock>,
}

impl HttpStatePorts {
    /// Network-free ports for local development and tests.
    ///
    /// # Examples
    /// ```
    /// use ethaum::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::fixtures());
    /// let _launches = &state.launches;
    /// ```
    pub fn fixtures() -> Self {
        Self {
            identity: Arc::new(FixtureIdentityProvider::default()),
            profiles: Arc::new(FixtureProfileRepository),
            startups: Arc::new(FixtureStartupRepository),
            enterprises: Arc::new(FixtureEnterpriseRepository),
            launches: Arc::new(FixtureLaunchRepository),
            reviews: Arc::new(FixtureReviewRepository),
            matches: Arc::new(FixtureMatchRepository),
            credibility: Arc::new(FixtureCredibilityRepository),
            ai: Arc::new(FixtureAiGateway),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Dependency bundle for HTTP handlers.
pub struct HttpState {
    identity: Arc<dyn IdentityProvider>,
    profile_repository: Arc<dyn ProfileRepository>,
    clock: Arc<dyn Clock>,
    pub profiles: ProfileService,
    pub startups: StartupService,
    pub enterprises: EnterpriseService,
    pub launches: LaunchService,
    pub reviews: ReviewService,
    pub matches: MatchService,
    pub credibility: CredibilityService,
    pub search: SearchService,
    pub ai: AiAssistant,
}

impl HttpState {
    /// Build every service from one ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            profiles,
            startups,
            enterprises,
            launches,
            reviews,
            matches,
            credibility,
            ai,
            clock,
        } = ports;
        Self {
            profiles: ProfileService::new(profiles.clone()),
            startups: StartupService::new(startups.clone(), clock.clone()),
            enterprises: EnterpriseService::new(enterprises.clone(), clock.clone()),
            launches: LaunchService::new(launches, startups.clone(), clock.clone()),
            reviews: ReviewService::new(
                reviews.clone(),
                startups.clone(),
                enterprises.clone(),
                clock.clone(),
            ),
            matches: MatchService::new(matches, startups.clone(), enterprises),
            credibility: CredibilityService::new(
                credibility,
                startups.clone(),
                reviews.clone(),
                clock.clone(),
            ),
            search: SearchService::new(startups, reviews),
            ai: AiAssistant::new(ai),
            identity,
            profile_repository: profiles,
            clock,
        }
    }

    /// Synchronizer whose local cache is the request's session cookie.
    ///
    /// The returned navigator records where the synchronizer asked to go.
    pub fn synchronizer<C: SessionCache>(
        &self,
        cache: C,
    ) -> (SessionSynchronizer<C>, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let ports = SessionPorts {
            identity: self.identity.clone(),
            profiles: self.profile_repository.clone(),
            navigator: navigator.clone(),
            clock: self.clock.clone(),
        };
        (SessionSynchronizer::new(ports, cache), navigator)
    }

    /// Resolve the signed-in caller from the session cookie.
    ///
    /// The profile row is always read fresh and written back to the cookie.
    pub async fn current_user(&self, session: &SessionContext) -> Result<UserProfile, Error> {
        let auth = session.require_session()?;
        let profile = self.profiles.authenticated(&auth, self.clock.utc()).await?;
        if let Err(error) = session.store_profile(&profile) {
            tracing::warn!(%error, "failed to refresh cached profile");
        }
        Ok(profile)
    }
}
