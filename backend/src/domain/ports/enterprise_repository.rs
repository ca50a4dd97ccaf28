//! Port for enterprise profile persistence.
use async_trait::async_trait;

use crate::domain::{Enterprise, EnterpriseId, EnterpriseProfile, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by enterprise repository adapters.
    pub enum EnterpriseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "enterprise repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "enterprise repository query failed: {message}",
        /// The owner already has an enterprise profile.
        Conflict { message: String } => "enterprise already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnterpriseRepository: Send + Sync {
    async fn find_by_id(&self, id: &EnterpriseId) -> Result<Option<Enterprise>, EnterpriseRepositoryError>;

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Enterprise>, EnterpriseRepositoryError>;

    async fn insert(&self, enterprise: &Enterprise) -> Result<(), EnterpriseRepositoryError>;

    async fn update_profile(
        &self,
        id: &EnterpriseId,
        profile: &EnterpriseProfile,
    ) -> Result<Option<Enterprise>, EnterpriseRepositoryError>;

    async fn delete(&self, id: &EnterpriseId) -> Result<bool, EnterpriseRepositoryError>;
}

/// Fixture repository with no rows that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEnterpriseRepository;

#[async_trait]
impl EnterpriseRepository for FixtureEnterpriseRepository {
    async fn find_by_id(&self, _id: &EnterpriseId) -> Result<Option<Enterprise>, EnterpriseRepositoryError> {
        Ok(None)
    }

    async fn find_by_owner(&self, _owner: &UserId) -> Result<Option<Enterprise>, EnterpriseRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _enterprise: &Enterprise) -> Result<(), EnterpriseRepositoryError> {
        Ok(())
    }

    async fn update_profile(
        &self,
        _id: &EnterpriseId,
        _profile: &EnterpriseProfile,
    ) -> Result<Option<Enterprise>, EnterpriseRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &EnterpriseId) -> Result<bool, EnterpriseRepositoryError> {
        Ok(false)
    }
}
