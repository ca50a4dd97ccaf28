//! Credibility breakdowns: compute, store, and serve.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    CredibilityRepository, CredibilityRepositoryError, ReviewRepository, StartupRepository,
};
use crate::domain::review_service::map_review_error;
use crate::domain::startup_service::map_startup_error;
use crate::domain::{
    CredibilityBreakdown, CredibilitySignals, Error, Startup, StartupId, UserProfile, UserType,
};

fn map_credibility_error(error: CredibilityRepositoryError) -> Error {
    match error {
        CredibilityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("credibility repository unavailable: {message}"))
        }
        CredibilityRepositoryError::Query { message } => {
            Error::internal(format!("credibility repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct CredibilityService {
    scores: Arc<dyn CredibilityRepository>,
    startups: Arc<dyn StartupRepository>,
    reviews: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl CredibilityService {
    pub fn new(
        scores: Arc<dyn CredibilityRepository>,
        startups: Arc<dyn StartupRepository>,
        reviews: Arc<dyn ReviewRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scores,
            startups,
            reviews,
            clock,
        }
    }

    /// Latest stored breakdown, computing one on first request.
    pub async fn get(&self, startup_id: &StartupId) -> Result<CredibilityBreakdown, Error> {
        if let Some(stored) = self
            .scores
            .latest(startup_id)
            .await
            .map_err(map_credibility_error)?
        {
            return Ok(stored);
        }
        let startup = self.find_startup(startup_id).await?;
        self.compute_and_store(&startup).await
    }

    /// Recompute on demand; owner or admin only.
    pub async fn recompute(
        &self,
        user: &UserProfile,
        startup_id: &StartupId,
    ) -> Result<CredibilityBreakdown, Error> {
        let startup = self.find_startup(startup_id).await?;
        if startup.owner_id != user.id && user.user_type != UserType::Admin {
            return Err(Error::forbidden(
                "only the startup owner may recompute its credibility",
            ));
        }
        self.compute_and_store(&startup).await
    }

    async fn find_startup(&self, startup_id: &StartupId) -> Result<Startup, Error> {
        self.startups
            .find_by_id(startup_id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| Error::not_found(format!("startup {startup_id} not found")))
    }

    async fn compute_and_store(&self, startup: &Startup) -> Result<CredibilityBreakdown, Error> {
        let summaries = self
            .reviews
            .summaries(std::slice::from_ref(&startup.id))
            .await
            .map_err(map_review_error)?;
        let engagement = self
            .scores
            .engagement(&startup.id)
            .await
            .map_err(map_credibility_error)?;
        let summary = summaries.get(&startup.id);
        let signals = CredibilitySignals {
            average_rating: summary.map(|s| s.average),
            review_count: summary.map_or(0, |s| s.count),
            is_verified: startup.is_verified,
            profile_complete: startup.profile.is_complete(),
            upvotes: engagement.upvotes,
            comments: engagement.comments,
            views: engagement.views,
            founded_year: startup.profile.founded_year,
        };
        let now = self.clock.utc();
        let breakdown = CredibilityBreakdown::compute(startup.id, signals.inputs(now), now);
        self.scores
            .save(&breakdown)
            .await
            .map_err(map_credibility_error)?;
        debug!(
            startup_id = %startup.id,
            overall = breakdown.overall,
            tier = %breakdown.tier(),
            "credibility recomputed"
        );
        Ok(breakdown)
    }
}
