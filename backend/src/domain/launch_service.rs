//! Launch listing, creation, upvotes, and comments.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{LaunchRepository, LaunchRepositoryError, StartupRepository};
use crate::domain::startup_service::map_startup_error;
use crate::domain::{
    CommentBody, CommentId, Error, Launch, LaunchComment, LaunchContent, LaunchDraft, LaunchId,
    PageRequest, StartupId, UpvoteToggle, UserProfile,
};

pub(crate) fn map_launch_error(error: LaunchRepositoryError) -> Error {
    match error {
        LaunchRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("launch repository unavailable: {message}"))
        }
        LaunchRepositoryError::Query { message } => {
            Error::internal(format!("launch repository error: {message}"))
        }
    }
}

fn launch_not_found(id: &LaunchId) -> Error {
    Error::not_found(format!("launch {id} not found"))
}

#[derive(Clone)]
pub struct LaunchService {
    launches: Arc<dyn LaunchRepository>,
    startups: Arc<dyn StartupRepository>,
    clock: Arc<dyn Clock>,
}

impl LaunchService {
    pub fn new(
        launches: Arc<dyn LaunchRepository>,
        startups: Arc<dyn StartupRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            launches,
            startups,
            clock,
        }
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Vec<Launch>, Error> {
        self.launches.list(page).await.map_err(map_launch_error)
    }

    pub async fn list_for_startup(&self, startup_id: &StartupId) -> Result<Vec<Launch>, Error> {
        self.launches
            .list_for_startup(startup_id)
            .await
            .map_err(map_launch_error)
    }

    /// Fetch a launch, counting the view.
    pub async fn view(&self, id: &LaunchId) -> Result<Launch, Error> {
        self.launches
            .record_view(id)
            .await
            .map_err(map_launch_error)?
            .ok_or_else(|| launch_not_found(id))
    }

    /// Publish a launch for the caller's startup.
    pub async fn create(&self, user: &UserProfile, draft: &LaunchDraft) -> Result<Launch, Error> {
        let content = LaunchContent::try_from(draft)?;
        let startup = self
            .startups
            .find_by_owner(&user.id)
            .await
            .map_err(map_startup_error)?
            .ok_or_else(|| Error::forbidden("create a startup profile before launching"))?;
        let launch = Launch {
            id: LaunchId::random(),
            startup_id: startup.id,
            content,
            upvote_count: 0,
            comment_count: 0,
            view_count: 0,
            created_at: self.clock.utc(),
        };
        self.launches
            .insert(&launch)
            .await
            .map_err(map_launch_error)?;
        debug!(launch_id = %launch.id, startup_id = %startup.id, "launch created");
        Ok(launch)
    }

    pub async fn toggle_upvote(&self, user: &UserProfile, id: &LaunchId) -> Result<UpvoteToggle, Error> {
        self.launches
            .toggle_upvote(id, &user.id)
            .await
            .map_err(map_launch_error)?
            .ok_or_else(|| launch_not_found(id))
    }

    pub async fn comments(&self, id: &LaunchId, page: &PageRequest) -> Result<Vec<LaunchComment>, Error> {
        self.ensure_exists(id).await?;
        self.launches
            .list_comments(id, page)
            .await
            .map_err(map_launch_error)
    }

    pub async fn add_comment(
        &self,
        user: &UserProfile,
        id: &LaunchId,
        raw: &str,
    ) -> Result<LaunchComment, Error> {
        let content = CommentBody::new(raw)?;
        self.ensure_exists(id).await?;
        let comment = LaunchComment {
            id: CommentId::random(),
            launch_id: *id,
            author_id: user.id.clone(),
            author_name: Some(user.full_name.clone()),
            content,
            created_at: self.clock.utc(),
        };
        self.launches
            .add_comment(&comment)
            .await
            .map_err(map_launch_error)?;
        Ok(comment)
    }

    async fn ensure_exists(&self, id: &LaunchId) -> Result<(), Error> {
        self.launches
            .find_by_id(id)
            .await
            .map_err(map_launch_error)?
            .map(|_| ())
            .ok_or_else(|| launch_not_found(id))
    }
}

#[cfg(test)]
#[path = "launch_service_tests.rs"]
mod tests;
