//! Port for startup/enterprise matches.
use async_trait::async_trait;

use crate::domain::{EnterpriseId, Match, MatchId, MatchStatus, StartupId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by match repository adapters.
    pub enum MatchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "match repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "match repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Matches involving either profile, best score first.
    async fn list_for(
        &self,
        startup_id: Option<StartupId>,
        enterprise_id: Option<EnterpriseId>,
    ) -> Result<Vec<Match>, MatchRepositoryError>;

    async fn find_by_id(&self, id: &MatchId) -> Result<Option<Match>, MatchRepositoryError>;

    /// Overwrite the status, returning the updated match.
    async fn set_status(
        &self,
        id: &MatchId,
        status: MatchStatus,
    ) -> Result<Option<Match>, MatchRepositoryError>;
}

/// Fixture repository with no rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchRepository;

#[async_trait]
impl MatchRepository for FixtureMatchRepository {
    async fn list_for(
        &self,
        _startup_id: Option<StartupId>,
        _enterprise_id: Option<EnterpriseId>,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &MatchId) -> Result<Option<Match>, MatchRepositoryError> {
        Ok(None)
    }

    async fn set_status(
        &self,
        _id: &MatchId,
        _status: MatchStatus,
    ) -> Result<Option<Match>, MatchRepositoryError> {
        Ok(None)
    }
}
