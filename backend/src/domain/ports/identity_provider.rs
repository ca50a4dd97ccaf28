//! Driven port for the hosted identity provider.
//!
//! The session synchronizer consumes exactly these five operations. Adapters
//! classify provider failures into [`AuthError`] and publish lifecycle events
//! to every subscriber.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::broadcast;

use crate::domain::{
    AuthError, AuthEvent, AuthSession, Email, SignInCredentials, SignUpOutcome, SignUpRequest,
    UserId,
};

/// Capacity of the lifecycle event channel.
pub const AUTH_EVENT_CAPACITY: usize = 16;

/// Identity provider operations used by the session synchronizer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError>;

    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, AuthError>;

    /// Invalidate `session` at the provider.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError>;

    /// Exchange the refresh token of `session` for a new token pair.
    async fn refresh(&self, session: &AuthSession) -> Result<AuthSession, AuthError>;

    /// Subscribe to lifecycle events.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Provider that accepts every well-formed request without a network.
///
/// Sessions are issued for a fresh random user and last one hour.
#[derive(Debug)]
pub struct FixtureIdentityProvider {
    events: broadcast::Sender<AuthEvent>,
}

impl Default for FixtureIdentityProvider {
    fn default() -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self { events }
    }
}

impl FixtureIdentityProvider {
    fn issue(&self, user_id: UserId, email: Email) -> AuthSession {
        AuthSession {
            user_id,
            email,
            access_token: "fixture-access-token".to_owned(),
            refresh_token: "fixture-refresh-token".to_owned(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn publish(&self, event: AuthEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let session = self.issue(UserId::random(), request.email().clone());
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, AuthError> {
        let session = self.issue(UserId::random(), credentials.email().clone());
        self.publish(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), AuthError> {
        self.publish(AuthEvent::SignedOut);
        Ok(())
    }

    async fn refresh(&self, session: &AuthSession) -> Result<AuthSession, AuthError> {
        let refreshed = self.issue(session.user_id.clone(), session.email.clone());
        self.publish(AuthEvent::TokenRefreshed(refreshed.clone()));
        Ok(refreshed)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_publishes_lifecycle_events() {
        let provider = FixtureIdentityProvider::default();
        let mut events = provider.subscribe();
        let credentials =
            SignInCredentials::try_from_parts("ada@example.com", "hunter22").expect("credentials");

        let session = provider.sign_in(&credentials).await.expect("sign in");
        assert!(!session.is_expired(Utc::now()));
        assert_eq!(events.recv().await.expect("event"), AuthEvent::SignedIn(session.clone()));

        let refreshed = provider.refresh(&session).await.expect("refresh");
        assert_eq!(refreshed.user_id, session.user_id);
        assert!(matches!(
            events.recv().await.expect("event"),
            AuthEvent::TokenRefreshed(_)
        ));

        provider.sign_out(&refreshed).await.expect("sign out");
        assert_eq!(events.recv().await.expect("event"), AuthEvent::SignedOut);
    }
}
