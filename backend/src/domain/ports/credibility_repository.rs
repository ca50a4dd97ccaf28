//! Port for stored credibility breakdowns and the engagement totals they
//! are computed from.
use async_trait::async_trait;

use crate::domain::{CredibilityBreakdown, StartupId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by credibility repository adapters.
    pub enum CredibilityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "credibility repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "credibility repository query failed: {message}",
    }
}

/// Interaction totals across every launch of a startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchEngagement {
    pub upvotes: u32,
    pub comments: u32,
    pub views: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredibilityRepository: Send + Sync {
    async fn engagement(&self, startup_id: &StartupId) -> Result<LaunchEngagement, CredibilityRepositoryError>;

    /// Most recent stored breakdown.
    async fn latest(
        &self,
        startup_id: &StartupId,
    ) -> Result<Option<CredibilityBreakdown>, CredibilityRepositoryError>;

    /// Store a breakdown and copy its overall score onto the startup row.
    async fn save(&self, breakdown: &CredibilityBreakdown) -> Result<(), CredibilityRepositoryError>;
}

/// Fixture repository with no engagement and no stored breakdowns.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredibilityRepository;

#[async_trait]
impl CredibilityRepository for FixtureCredibilityRepository {
    async fn engagement(&self, _startup_id: &StartupId) -> Result<LaunchEngagement, CredibilityRepositoryError> {
        Ok(LaunchEngagement::default())
    }

    async fn latest(
        &self,
        _startup_id: &StartupId,
    ) -> Result<Option<CredibilityBreakdown>, CredibilityRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _breakdown: &CredibilityBreakdown) -> Result<(), CredibilityRepositoryError> {
        Ok(())
    }
}
