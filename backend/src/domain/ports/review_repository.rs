//! Port for startup reviews and rating aggregates.
use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{PageRequest, RatingSummary, Review, StartupId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Newest reviews first.
    async fn list_for_startup(
        &self,
        startup_id: &StartupId,
        page: &PageRequest,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Insert a review and increment the startup's review counter.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Rating summaries for the given startups; startups without reviews
    /// are absent from the map.
    async fn summaries(
        &self,
        startup_ids: &[StartupId],
    ) -> Result<HashMap<StartupId, RatingSummary>, ReviewRepositoryError>;
}

/// Fixture repository with no rows that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewRepository;

#[async_trait]
impl ReviewRepository for FixtureReviewRepository {
    async fn list_for_startup(
        &self,
        _startup_id: &StartupId,
        _page: &PageRequest,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _review: &Review) -> Result<(), ReviewRepositoryError> {
        Ok(())
    }

    async fn summaries(
        &self,
        _startup_ids: &[StartupId],
    ) -> Result<HashMap<StartupId, RatingSummary>, ReviewRepositoryError> {
        Ok(HashMap::new())
    }
}
