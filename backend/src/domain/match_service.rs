//! Match listing and status updates.

use std::sync::Arc;

use tracing::debug;

use crate::domain::enterprise_service::map_enterprise_error;
use crate::domain::ports::{
    EnterpriseRepository, MatchRepository, MatchRepositoryError, StartupRepository,
};
use crate::domain::startup_service::map_startup_error;
use crate::domain::{EnterpriseId, Error, Match, MatchId, MatchStatus, StartupId, UserProfile, UserType};

fn map_match_error(error: MatchRepositoryError) -> Error {
    match error {
        MatchRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("match repository unavailable: {message}"))
        }
        MatchRepositoryError::Query { message } => {
            Error::internal(format!("match repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct MatchService {
    matches: Arc<dyn MatchRepository>,
    startups: Arc<dyn StartupRepository>,
    enterprises: Arc<dyn EnterpriseRepository>,
}

impl MatchService {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        startups: Arc<dyn StartupRepository>,
        enterprises: Arc<dyn EnterpriseRepository>,
    ) -> Self {
        Self {
            matches,
            startups,
            enterprises,
        }
    }

    /// Matches on either side of the caller's profiles.
    pub async fn list(&self, user: &UserProfile) -> Result<Vec<Match>, Error> {
        let (startup, enterprise) = self.owned_profiles(user).await?;
        if startup.is_none() && enterprise.is_none() {
            return Ok(Vec::new());
        }
        self.matches
            .list_for(startup, enterprise)
            .await
            .map_err(map_match_error)
    }

    /// Overwrite a match status. Only participants and admins may do so.
    pub async fn set_status(
        &self,
        user: &UserProfile,
        id: &MatchId,
        status: MatchStatus,
    ) -> Result<Match, Error> {
        let current = self
            .matches
            .find_by_id(id)
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| Error::not_found(format!("match {id} not found")))?;
        if user.user_type != UserType::Admin {
            let (startup, enterprise) = self.owned_profiles(user).await?;
            if !current.involves(startup, enterprise) {
                return Err(Error::forbidden("only match participants may change its status"));
            }
        }
        let updated = self
            .matches
            .set_status(id, status)
            .await
            .map_err(map_match_error)?
            .ok_or_else(|| Error::not_found(format!("match {id} not found")))?;
        debug!(match_id = %id, from = %current.status, to = %status, "match status updated");
        Ok(updated)
    }

    async fn owned_profiles(
        &self,
        user: &UserProfile,
    ) -> Result<(Option<StartupId>, Option<EnterpriseId>), Error> {
        let startup = self
            .startups
            .find_by_owner(&user.id)
            .await
            .map_err(map_startup_error)?
            .map(|s| s.id);
        let enterprise = self
            .enterprises
            .find_by_owner(&user.id)
            .await
            .map_err(map_enterprise_error)?
            .map(|e| e.id);
        Ok((startup, enterprise))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::MatchScore;
    use crate::domain::ports::{
        MockEnterpriseRepository, MockMatchRepository, MockStartupRepository,
    };
    use crate::test_support::{fixture_timestamp, profile, startup_owned_by};
    use rstest::rstest;

    fn pending_match(startup_id: StartupId) -> Match {
        Match {
            id: MatchId::random(),
            startup_id,
            enterprise_id: EnterpriseId::random(),
            match_score: MatchScore::saturating(87),
            status: MatchStatus::Pending,
            created_at: fixture_timestamp(),
        }
    }

    fn no_enterprise() -> MockEnterpriseRepository {
        let mut enterprises = MockEnterpriseRepository::new();
        enterprises.expect_find_by_owner().returning(|_| Ok(None));
        enterprises
    }

    #[rstest]
    #[tokio::test]
    async fn users_without_profiles_see_no_matches() {
        let mut startups = MockStartupRepository::new();
        startups.expect_find_by_owner().return_once(|_| Ok(None));
        let mut matches = MockMatchRepository::new();
        matches.expect_list_for().never();

        let service = MatchService::new(Arc::new(matches), Arc::new(startups), Arc::new(no_enterprise()));
        let listed = service.list(&profile(UserType::Startup)).await.expect("list");

        assert!(listed.is_empty());
    }

    #[rstest]
    #[case(MatchStatus::Interested)]
    #[case(MatchStatus::Declined)]
    #[case(MatchStatus::Pending)]
    #[tokio::test]
    async fn participants_may_set_any_status(#[case] status: MatchStatus) {
        let owner = profile(UserType::Startup);
        let startup = startup_owned_by(&owner.id);
        let existing = pending_match(startup.id);
        let id = existing.id;
        let mut updated = existing.clone();
        updated.status = status;

        let mut startups = MockStartupRepository::new();
        startups
            .expect_find_by_owner()
            .return_once(move |_| Ok(Some(startup)));
        let mut matches = MockMatchRepository::new();
        matches
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        matches
            .expect_set_status()
            .withf(move |_, next| *next == status)
            .return_once(move |_, _| Ok(Some(updated)));

        let service = MatchService::new(Arc::new(matches), Arc::new(startups), Arc::new(no_enterprise()));
        let result = service.set_status(&owner, &id, status).await.expect("updated");

        assert_eq!(result.status, status);
    }

    #[rstest]
    #[tokio::test]
    async fn outsiders_are_forbidden() {
        let existing = pending_match(StartupId::random());
        let id = existing.id;
        let mut startups = MockStartupRepository::new();
        startups.expect_find_by_owner().return_once(|_| Ok(None));
        let mut matches = MockMatchRepository::new();
        matches
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        matches.expect_set_status().never();

        let service = MatchService::new(Arc::new(matches), Arc::new(startups), Arc::new(no_enterprise()));
        let err = service
            .set_status(&profile(UserType::Enterprise), &id, MatchStatus::Connected)
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
