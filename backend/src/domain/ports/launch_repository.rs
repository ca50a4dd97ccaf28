//! Port for launches and their interaction counters.
//!
//! Counter mutations (views, upvotes, comments) run as single statements in
//! one transaction per call; ordering between racing callers is whatever the
//! database decides.

use async_trait::async_trait;

use crate::domain::{
    Launch, LaunchComment, LaunchId, PageRequest, StartupId, UpvoteToggle, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by launch repository adapters.
    pub enum LaunchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "launch repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "launch repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LaunchRepository: Send + Sync {
    /// Newest launches first.
    async fn list(&self, page: &PageRequest) -> Result<Vec<Launch>, LaunchRepositoryError>;

    async fn list_for_startup(&self, startup_id: &StartupId) -> Result<Vec<Launch>, LaunchRepositoryError>;

    async fn find_by_id(&self, id: &LaunchId) -> Result<Option<Launch>, LaunchRepositoryError>;

    /// Increment the view counter and return the updated launch.
    async fn record_view(&self, id: &LaunchId) -> Result<Option<Launch>, LaunchRepositoryError>;

    async fn insert(&self, launch: &Launch) -> Result<(), LaunchRepositoryError>;

    /// Add or remove the caller's upvote, adjusting the launch and startup
    /// counters. `None` when the launch does not exist.
    async fn toggle_upvote(
        &self,
        id: &LaunchId,
        user_id: &UserId,
    ) -> Result<Option<UpvoteToggle>, LaunchRepositoryError>;

    /// Oldest comments first.
    async fn list_comments(
        &self,
        id: &LaunchId,
        page: &PageRequest,
    ) -> Result<Vec<LaunchComment>, LaunchRepositoryError>;

    /// Insert a comment and increment the comment counter.
    async fn add_comment(&self, comment: &LaunchComment) -> Result<(), LaunchRepositoryError>;
}

/// Fixture repository with no rows that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLaunchRepository;

#[async_trait]
impl LaunchRepository for FixtureLaunchRepository {
    async fn list(&self, _page: &PageRequest) -> Result<Vec<Launch>, LaunchRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_startup(&self, _startup_id: &StartupId) -> Result<Vec<Launch>, LaunchRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &LaunchId) -> Result<Option<Launch>, LaunchRepositoryError> {
        Ok(None)
    }

    async fn record_view(&self, _id: &LaunchId) -> Result<Option<Launch>, LaunchRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _launch: &Launch) -> Result<(), LaunchRepositoryError> {
        Ok(())
    }

    async fn toggle_upvote(
        &self,
        _id: &LaunchId,
        _user_id: &UserId,
    ) -> Result<Option<UpvoteToggle>, LaunchRepositoryError> {
        Ok(None)
    }

    async fn list_comments(
        &self,
        _id: &LaunchId,
        _page: &PageRequest,
    ) -> Result<Vec<LaunchComment>, LaunchRepositoryError> {
        Ok(Vec::new())
    }

    async fn add_comment(&self, _comment: &LaunchComment) -> Result<(), LaunchRepositoryError> {
        Ok(())
    }
}
