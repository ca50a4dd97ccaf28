//! Port for startup profile persistence and search.
use async_trait::async_trait;

use crate::domain::{Startup, StartupId, StartupProfile, StartupQuery, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by startup repository adapters.
    pub enum StartupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "startup repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "startup repository query failed: {message}",
        /// The owner already has a startup profile.
        Conflict { message: String } => "startup already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StartupRepository: Send + Sync {
    async fn find_by_id(&self, id: &StartupId) -> Result<Option<Startup>, StartupRepositoryError>;

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Startup>, StartupRepositoryError>;

    /// Insert a new startup; [`StartupRepositoryError::Conflict`] when the
    /// owner already has one.
    async fn insert(&self, startup: &Startup) -> Result<(), StartupRepositoryError>;

    /// Replace the owner-editable attributes, returning the updated row.
    async fn update_profile(
        &self,
        id: &StartupId,
        profile: &StartupProfile,
    ) -> Result<Option<Startup>, StartupRepositoryError>;

    /// Delete a startup; `false` when it did not exist.
    async fn delete(&self, id: &StartupId) -> Result<bool, StartupRepositoryError>;

    /// Evaluate the SQL-side part of a search.
    async fn search(&self, query: &StartupQuery) -> Result<Vec<Startup>, StartupRepositoryError>;
}

/// Fixture repository with no rows that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStartupRepository;

#[async_trait]
impl StartupRepository for FixtureStartupRepository {
    async fn find_by_id(&self, _id: &StartupId) -> Result<Option<Startup>, StartupRepositoryError> {
        Ok(None)
    }

    async fn find_by_owner(&self, _owner: &UserId) -> Result<Option<Startup>, StartupRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _startup: &Startup) -> Result<(), StartupRepositoryError> {
        Ok(())
    }

    async fn update_profile(
        &self,
        _id: &StartupId,
        _profile: &StartupProfile,
    ) -> Result<Option<Startup>, StartupRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &StartupId) -> Result<bool, StartupRepositoryError> {
        Ok(false)
    }

    async fn search(&self, _query: &StartupQuery) -> Result<Vec<Startup>, StartupRepositoryError> {
        Ok(Vec::new())
    }
}
