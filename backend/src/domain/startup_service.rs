//! Startup profile CRUD.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{StartupRepository, StartupRepositoryError};
use crate::domain::{
    Error, Startup, StartupDraft, StartupId, StartupProfile, UserProfile, UserType,
};

pub(crate) fn map_startup_error(error: StartupRepositoryError) -> Error {
    match error {
        StartupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("startup repository unavailable: {message}"))
        }
        StartupRepositoryError::Query { message } => {
            Error::internal(format!("startup repository error: {message}"))
        }
        StartupRepositoryError::Conflict { .. } => {
            Error::conflict("a startup profile already exists for this user")
        }
    }
}

/// Reject callers that cannot act as `required`.
pub(crate) fn require_role(user: &UserProfile, required: UserType) -> Result<(), Error> {
    if user.acts_as(required) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "only {required} accounts may perform this action"
        )))
    }
}

#[derive(Clone)]
pub struct StartupService {
    startups: Arc<dyn StartupRepository>,
    clock: Arc<dyn Clock>,
}

impl StartupService {
    pub fn new(startups: Arc<dyn StartupRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { startups, clock }
    }

    pub async fn get(&self, id: &StartupId) -> Result<Startup, Error> {
        self.startups
            .find_by_id(id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| Error::not_found(format!("startup {id} not found")))
    }

    /// The caller's own startup profile.
    pub async fn mine(&self, user: &UserProfile) -> Result<Startup, Error> {
        self.startups
            .find_by_owner(&user.id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| Error::not_found("no startup profile for this user"))
    }

    pub async fn create(&self, user: &UserProfile, draft: &StartupDraft) -> Result<Startup, Error> {
        require_role(user, UserType::Startup)?;
        let profile = StartupProfile::try_from(draft)?;
        if self
            .startups
            .find_by_owner(&user.id)
            .await
            .map_err(map_startup_error)?
            .is_some()
        {
            return Err(Error::conflict("a startup profile already exists for this user"));
        }
        let startup = Startup {
            id: StartupId::random(),
            owner_id: user.id.clone(),
            profile,
            credibility_score: 0,
            total_upvotes: 0,
            total_reviews: 0,
            is_verified: false,
            created_at: self.clock.utc(),
        };
        self.startups
            .insert(&startup)
            .await
            .map_err(map_startup_error)?;
        Ok(startup)
    }

    pub async fn update(&self, user: &UserProfile, draft: &StartupDraft) -> Result<Startup, Error> {
        let existing = self.mine(user).await?;
        let profile = StartupProfile::try_from(draft)?;
        self.startups
            .update_profile(&existing.id, &profile)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| Error::not_found("no startup profile for this user"))
    }

    pub async fn delete(&self, user: &UserProfile) -> Result<(), Error> {
        let existing = self.mine(user).await?;
        let deleted = self
            .startups
            .delete(&existing.id)
            .await
            .map_err(map_startup_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("no startup profile for this user"))
        }
    }
}

#[cfg(test)]
#[path = "startup_service_tests.rs"]
mod tests;
