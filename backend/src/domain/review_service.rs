//! Startup reviews.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::enterprise_service::map_enterprise_error;
use crate::domain::ports::{
    EnterpriseRepository, ReviewRepository, ReviewRepositoryError, StartupRepository,
};
use crate::domain::startup_service::map_startup_error;
use crate::domain::{
    Error, PageRequest, Review, ReviewContent, ReviewDraft, ReviewId, StartupId, UserProfile,
};

pub(crate) fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    startups: Arc<dyn StartupRepository>,
    enterprises: Arc<dyn EnterpriseRepository>,
    clock: Arc<dyn Clock>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        startups: Arc<dyn StartupRepository>,
        enterprises: Arc<dyn EnterpriseRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reviews,
            startups,
            enterprises,
            clock,
        }
    }

    pub async fn list(&self, startup_id: &StartupId, page: &PageRequest) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_for_startup(startup_id, page)
            .await
            .map_err(map_review_error)
    }

    /// Record a review by `user`.
    ///
    /// Owners cannot review their own startup. A reviewer who owns an
    /// enterprise profile has it linked to the review.
    pub async fn create(
        &self,
        user: &UserProfile,
        startup_id: &StartupId,
        draft: &ReviewDraft,
    ) -> Result<Review, Error> {
        let content = ReviewContent::try_from(draft)?;
        let startup = self
            .startups
            .find_by_id(startup_id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| Error::not_found(format!("startup {startup_id} not found")))?;
        if startup.owner_id == user.id {
            return Err(Error::forbidden("you cannot review your own startup"));
        }
        let enterprise_id = self
            .enterprises
            .find_by_owner(&user.id)
            .await
            .map_err(map_enterprise_error)?
            .map(|enterprise| enterprise.id);

        let review = Review {
            id: ReviewId::random(),
            startup_id: startup.id,
            author_id: user.id.clone(),
            author_name: Some(user.full_name.clone()),
            enterprise_id,
            content,
            created_at: self.clock.utc(),
        };
        self.reviews.insert(&review).await.map_err(map_review_error)?;
        Ok(review)
    }
}
