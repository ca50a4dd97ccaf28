//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod ai_gateway;
mod credibility_repository;
mod enterprise_repository;
mod identity_provider;
mod launch_repository;
mod match_repository;
mod navigator;
mod profile_repository;
mod review_repository;
mod session_cache;
mod startup_repository;

#[cfg(test)]
pub use ai_gateway::MockAiGateway;
pub use ai_gateway::{AiGateway, AiGatewayError, FixtureAiGateway};
#[cfg(test)]
pub use credibility_repository::MockCredibilityRepository;
pub use credibility_repository::{
    CredibilityRepository, CredibilityRepositoryError, FixtureCredibilityRepository,
    LaunchEngagement,
};
#[cfg(test)]
pub use enterprise_repository::MockEnterpriseRepository;
pub use enterprise_repository::{
    EnterpriseRepository, EnterpriseRepositoryError, FixtureEnterpriseRepository,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{AUTH_EVENT_CAPACITY, FixtureIdentityProvider, IdentityProvider};
#[cfg(test)]
pub use launch_repository::MockLaunchRepository;
pub use launch_repository::{FixtureLaunchRepository, LaunchRepository, LaunchRepositoryError};
#[cfg(test)]
pub use match_repository::MockMatchRepository;
pub use match_repository::{FixtureMatchRepository, MatchRepository, MatchRepositoryError};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{Navigator, RecordingNavigator};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{FixtureReviewRepository, ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use session_cache::MockSessionCache;
pub use session_cache::{InMemorySessionCache, SessionCache, SessionCacheError};
#[cfg(test)]
pub use startup_repository::MockStartupRepository;
pub use startup_repository::{
    FixtureStartupRepository, StartupRepository, StartupRepositoryError,
};
