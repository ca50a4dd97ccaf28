//! Self-service edits to the signed-in user's profile row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};

use crate::domain::{
    AuthSession, Error, FullName, UserProfile, UserValidationError, parse_avatar_url,
};

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    /// `Some("")` clears the avatar.
    pub avatar_url: Option<String>,
}

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

fn invalid_field(field: &str, error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_value",
    }))
}

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Resolve the profile behind a stored session.
    ///
    /// Expired sessions are unauthorised; sessions without a profile row
    /// are forbidden from acting until onboarding completes.
    pub async fn authenticated(
        &self,
        session: &AuthSession,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, Error> {
        if session.is_expired(now) {
            return Err(Error::unauthorized("session expired; refresh or sign in again"));
        }
        self.profiles
            .fetch_profile(&session.user_id)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::forbidden("no profile exists for this account"))
    }

    /// Apply `update` to `current` and persist the result.
    pub async fn update(&self, current: &UserProfile, update: &ProfileUpdate) -> Result<UserProfile, Error> {
        let mut next = current.clone();
        if let Some(name) = &update.full_name {
            next.full_name = FullName::new(name).map_err(|err| invalid_field("fullName", err))?;
        }
        if let Some(raw) = &update.avatar_url {
            next.avatar_url = if raw.trim().is_empty() {
                None
            } else {
                Some(parse_avatar_url(raw).map_err(|err| invalid_field("avatarUrl", err))?)
            };
        }
        self.profiles
            .upsert_profile(&next)
            .await
            .map_err(map_profile_error)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::UserType;
    use crate::domain::ports::MockProfileRepository;
    use crate::test_support::{fixture_timestamp, profile, session_for};
    use chrono::Duration;

    #[tokio::test]
    async fn authenticated_rejects_expired_sessions_without_a_lookup() {
        let user = profile(UserType::Startup);
        let session = session_for(&user.id);
        let service = ProfileService::new(Arc::new(MockProfileRepository::new()));

        let err = service
            .authenticated(&session, fixture_timestamp() + Duration::hours(2))
            .await
            .expect_err("expired");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn authenticated_requires_a_profile_row() {
        let user = profile(UserType::Enterprise);
        let session = session_for(&user.id);
        let mut repo = MockProfileRepository::new();
        repo.expect_fetch_profile().times(1).return_once(|_| Ok(None));
        let service = ProfileService::new(Arc::new(repo));

        let err = service
            .authenticated(&session, fixture_timestamp())
            .await
            .expect_err("no profile");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn authenticated_returns_the_stored_profile() {
        let user = profile(UserType::Enterprise);
        let session = session_for(&user.id);
        let stored = user.clone();
        let mut repo = MockProfileRepository::new();
        repo.expect_fetch_profile()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));
        let service = ProfileService::new(Arc::new(repo));

        let found = service
            .authenticated(&session, fixture_timestamp())
            .await
            .expect("profile");
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn update_persists_new_name_and_clears_avatar() {
        let mut current = profile(UserType::Startup);
        current.avatar_url = Some(url::Url::parse("https://cdn.example.com/a.png").expect("url"));
        let mut repo = MockProfileRepository::new();
        repo.expect_upsert_profile()
            .withf(|p| p.full_name.as_ref() == "Ada King" && p.avatar_url.is_none())
            .times(1)
            .return_once(|_| Ok(()));
        let service = ProfileService::new(Arc::new(repo));

        let updated = service
            .update(
                &current,
                &ProfileUpdate {
                    full_name: Some(" Ada King ".into()),
                    avatar_url: Some(String::new()),
                },
            )
            .await
            .expect("updated");

        assert_eq!(updated.id, current.id);
        assert_eq!(updated.full_name.as_ref(), "Ada King");
    }

    #[tokio::test]
    async fn invalid_avatar_is_rejected_before_persisting() {
        let mut repo = MockProfileRepository::new();
        repo.expect_upsert_profile().never();
        let service = ProfileService::new(Arc::new(repo));

        let err = service
            .update(
                &profile(UserType::Enterprise),
                &ProfileUpdate {
                    full_name: None,
                    avatar_url: Some("javascript:alert(1)".into()),
                },
            )
            .await
            .expect_err("invalid avatar");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
            Some("avatarUrl")
        );
    }

    #[tokio::test]
    async fn connection_failures_map_to_service_unavailable() {
        let mut repo = MockProfileRepository::new();
        repo.expect_upsert_profile()
            .return_once(|_| Err(ProfileRepositoryError::connection("refused")));
        let service = ProfileService::new(Arc::new(repo));

        let err = service
            .update(&profile(UserType::Startup), &ProfileUpdate::default())
            .await
            .expect_err("unavailable");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
