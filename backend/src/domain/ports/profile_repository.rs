//! Port for the authoritative user profile rows.
use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile row for `id`; `None` when the user never onboarded.
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Insert or update a profile row.
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), ProfileRepositoryError>;
}

/// Fixture repository with no rows that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn fetch_profile(&self, _id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(None)
    }

    async fn upsert_profile(&self, _profile: &UserProfile) -> Result<(), ProfileRepositoryError> {
        Ok(())
    }
}
