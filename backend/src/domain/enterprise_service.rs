//! Enterprise profile CRUD.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{EnterpriseRepository, EnterpriseRepositoryError};
use crate::domain::startup_service::require_role;
use crate::domain::{
    Enterprise, EnterpriseDraft, EnterpriseId, EnterpriseProfile, Error, UserProfile, UserType,
};

pub(crate) fn map_enterprise_error(error: EnterpriseRepositoryError) -> Error {
    match error {
        EnterpriseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("enterprise repository unavailable: {message}"))
        }
        EnterpriseRepositoryError::Query { message } => {
            Error::internal(format!("enterprise repository error: {message}"))
        }
        EnterpriseRepositoryError::Conflict { .. } => {
            Error::conflict("an enterprise profile already exists for this user")
        }
    }
}

#[derive(Clone)]
pub struct EnterpriseService {
    enterprises: Arc<dyn EnterpriseRepository>,
    clock: Arc<dyn Clock>,
}

impl EnterpriseService {
    pub fn new(enterprises: Arc<dyn EnterpriseRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { enterprises, clock }
    }

    pub async fn get(&self, id: &EnterpriseId) -> Result<Enterprise, Error> {
        self.enterprises
            .find_by_id(id)
            .await
            .map_err(map_enterprise_error)?
            .ok_or_else(|| Error::not_found(format!("enterprise {id} not found")))
    }

    pub async fn mine(&self, user: &UserProfile) -> Result<Enterprise, Error> {
        self.enterprises
            .find_by_owner(&user.id)
            .await
            .map_err(map_enterprise_error)?
            .ok_or_else(|| Error::not_found("no enterprise profile for this user"))
    }

    pub async fn create(
        &self,
        user: &UserProfile,
        draft: &EnterpriseDraft,
    ) -> Result<Enterprise, Error> {
        require_role(user, UserType::Enterprise)?;
        let profile = EnterpriseProfile::try_from(draft)?;
        let enterprise = Enterprise {
            id: EnterpriseId::random(),
            owner_id: user.id.clone(),
            profile,
            created_at: self.clock.utc(),
        };
        // The unique owner index reports duplicates as a conflict.
        self.enterprises
            .insert(&enterprise)
            .await
            .map_err(map_enterprise_error)?;
        Ok(enterprise)
    }

    pub async fn update(
        &self,
        user: &UserProfile,
        draft: &EnterpriseDraft,
    ) -> Result<Enterprise, Error> {
        let existing = self.mine(user).await?;
        let profile = EnterpriseProfile::try_from(draft)?;
        self.enterprises
            .update_profile(&existing.id, &profile)
            .await
            .map_err(map_enterprise_error)?
            .ok_or_else(|| Error::not_found("no enterprise profile for this user"))
    }

    pub async fn delete(&self, user: &UserProfile) -> Result<(), Error> {
        let existing = self.mine(user).await?;
        if self
            .enterprises
            .delete(&existing.id)
            .await
            .map_err(map_enterprise_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found("no enterprise profile for this user"))
        }
    }
}
