//! Session synchronizer.
//!
//! Reconciles three sources that can disagree: the local [`SessionCache`],
//! the identity provider's session, and the authoritative profile row. The
//! result is published as one [`SessionState`] value through a `watch`
//! channel.
//!
//! Only [`SessionSynchronizer::sign_out`] navigates. Passive provider events
//! update state and cache but never move the client.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use mockable::Clock;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::ports::{IdentityProvider, Navigator, ProfileRepository, SessionCache};
use crate::domain::{
    AuthError, AuthEvent, AuthSession, SignInCredentials, SignUpOutcome, SignUpRequest, UserId,
    UserProfile, UserType,
};

use super::state::{ProfileState, SessionState};

/// Route the client lands on after an explicit sign-out.
pub const HOME_ROUTE: &str = "/";

/// Collaborators shared by every synchronizer instance.
#[derive(Clone)]
pub struct SessionPorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub navigator: Arc<dyn Navigator>,
    pub clock: Arc<dyn Clock>,
}

/// Marks a profile fetch for one user as running until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<UserId>>,
    user_id: UserId,
}

impl<'a> InFlight<'a> {
    /// `None` when a fetch for `user_id` is already running.
    fn try_acquire(set: &'a Mutex<HashSet<UserId>>, user_id: &UserId) -> Option<Self> {
        let mut guard = set.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(user_id.clone()).then(|| Self {
            set,
            user_id: user_id.clone(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.user_id);
    }
}

/// Single source of truth for the signed-in user.
pub struct SessionSynchronizer<C> {
    ports: SessionPorts,
    cache: C,
    state: watch::Sender<SessionState>,
    in_flight: Mutex<HashSet<UserId>>,
}

impl<C> SessionSynchronizer<C>
where
    C: SessionCache,
{
    pub fn new(ports: SessionPorts, cache: C) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            ports,
            cache,
            state,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn set_state(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    fn current_session(&self) -> Option<AuthSession> {
        self.state.borrow().session().cloned()
    }

    /// Reconcile the cached session with the provider and the profile row.
    ///
    /// No network is used when the cache holds no session.
    pub async fn initialize(&self) {
        let cached_profile = self.cache.load_profile().unwrap_or_else(|error| {
            warn!(%error, "ignoring unreadable cached profile");
            None
        });
        self.set_state(SessionState::Loading { cached_profile });

        let cached_session = self.cache.load_session().unwrap_or_else(|error| {
            warn!(%error, "ignoring unreadable cached session");
            None
        });
        let Some(session) = cached_session else {
            self.clear_cache();
            self.set_state(SessionState::Anonymous);
            return;
        };

        let session = if session.is_expired(self.ports.clock.utc()) {
            match self.ports.identity.refresh(&session).await {
                Ok(refreshed) => {
                    self.store_session(&refreshed);
                    refreshed
                }
                Err(error) => {
                    info!(%error, "cached session expired and could not be refreshed");
                    self.clear_cache();
                    self.set_state(SessionState::Anonymous);
                    return;
                }
            }
        } else {
            session
        };

        let profile = self.fetch_profile(&session.user_id).await;
        self.set_state(SessionState::Authenticated { session, profile });
    }

    /// Register an account and, when the provider issues a session right
    /// away, sign it in.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let outcome = self.ports.identity.sign_up(request).await?;
        let user_id = match &outcome {
            SignUpOutcome::SignedIn(session) => session.user_id.clone(),
            SignUpOutcome::ConfirmationRequired { user_id, .. } => user_id.clone(),
        };
        let profile = UserProfile {
            id: user_id,
            email: request.email().clone(),
            full_name: request.full_name().clone(),
            avatar_url: None,
            user_type: request.user_type(),
        };
        let saved = match self.ports.profiles.upsert_profile(&profile).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, user_id = %profile.id, "failed to create profile row at sign-up");
                false
            }
        };

        match &outcome {
            SignUpOutcome::SignedIn(session) => {
                self.store_session(session);
                let profile = if saved {
                    self.store_cached_profile(&profile);
                    ProfileState::Ready(profile)
                } else {
                    ProfileState::Unavailable
                };
                self.set_state(SessionState::Authenticated {
                    session: session.clone(),
                    profile,
                });
            }
            SignUpOutcome::ConfirmationRequired { .. } => {
                self.clear_cache();
                self.set_state(SessionState::Anonymous);
            }
        }
        Ok(outcome)
    }

    /// Authenticate and load the profile.
    ///
    /// When `expected` is given and the fetched profile cannot act as that
    /// type, the new session is signed out at the provider, nothing is
    /// retained locally, and [`AuthError::UserTypeMismatch`] is returned.
    /// A missing profile never mismatches.
    pub async fn sign_in(
        &self,
        credentials: &SignInCredentials,
        expected: Option<UserType>,
    ) -> Result<SessionState, AuthError> {
        let session = self.ports.identity.sign_in(credentials).await?;
        self.store_session(&session);
        let profile = {
            // Held so the provider's SignedIn event does not refetch.
            let _in_flight = InFlight::try_acquire(&self.in_flight, &session.user_id);
            self.fetch_profile(&session.user_id).await
        };

        if let (Some(expected), ProfileState::Ready(found)) = (expected, &profile) {
            if !found.acts_as(expected) {
                let actual = found.user_type;
                self.clear_cache();
                self.set_state(SessionState::Anonymous);
                if let Err(error) = self.ports.identity.sign_out(&session).await {
                    warn!(%error, "failed to revoke session after user type mismatch");
                }
                return Err(AuthError::UserTypeMismatch { expected, actual });
            }
        }

        let state = SessionState::Authenticated { session, profile };
        self.set_state(state.clone());
        Ok(state)
    }

    /// Clear local state and cache, revoke the provider session, then
    /// navigate home.
    ///
    /// The cache is empty before navigation whatever the provider answers.
    /// A provider failure is returned after navigation has happened.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.current_session().or_else(|| {
            self.cache.load_session().unwrap_or_else(|error| {
                warn!(%error, "ignoring unreadable cached session");
                None
            })
        });
        self.clear_cache();
        self.set_state(SessionState::Anonymous);

        let result = match session {
            Some(session) => self.ports.identity.sign_out(&session).await,
            None => Ok(()),
        };
        self.ports.navigator.navigate(HOME_ROUTE);
        result
    }

    /// Re-fetch the profile of the signed-in user.
    ///
    /// Returns `None` when nobody is signed in.
    pub async fn refresh_profile(&self) -> Option<ProfileState> {
        let session = self.current_session()?;
        let profile = self.fetch_profile(&session.user_id).await;
        self.state.send_if_modified(|state| match state {
            SessionState::Authenticated {
                session: current,
                profile: slot,
            } if current.user_id == session.user_id => {
                *slot = profile.clone();
                true
            }
            _ => false,
        });
        Some(profile)
    }

    /// Exchange the refresh token for a new session.
    ///
    /// Returns `Ok(None)` when nobody is signed in.
    pub async fn refresh_session(&self) -> Result<Option<AuthSession>, AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        let refreshed = self.ports.identity.refresh(&session).await?;
        self.handle_event(AuthEvent::TokenRefreshed(refreshed.clone()))
            .await;
        Ok(Some(refreshed))
    }

    /// Apply one provider lifecycle event. Never navigates.
    pub async fn handle_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => {
                self.adopt_session(session).await;
            }
            AuthEvent::SignedOut => {
                self.clear_cache();
                self.set_state(SessionState::Anonymous);
            }
        }
    }

    /// Drain provider events until the channel closes.
    pub async fn listen(&self, events: &mut broadcast::Receiver<AuthEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Apply the events already queued on `events` without waiting for more.
    pub async fn catch_up(&self, events: &mut broadcast::Receiver<AuthEvent>) {
        loop {
            match events.try_recv() {
                Ok(event) => self.handle_event(event).await,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "session event stream lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    async fn adopt_session(&self, session: AuthSession) {
        self.store_session(&session);
        let Some(_in_flight) = InFlight::try_acquire(&self.in_flight, &session.user_id) else {
            debug!(user_id = %session.user_id, "profile fetch already in flight");
            self.state.send_if_modified(|state| match state {
                SessionState::Authenticated { session: current, .. }
                    if current.user_id == session.user_id =>
                {
                    *current = session.clone();
                    true
                }
                _ => false,
            });
            return;
        };
        let profile = self.fetch_profile(&session.user_id).await;
        self.set_state(SessionState::Authenticated { session, profile });
    }

    /// Fetch the profile row and mirror the outcome into the cache.
    ///
    /// Fetch failures are logged and reported as
    /// [`ProfileState::Unavailable`], never as errors.
    async fn fetch_profile(&self, user_id: &UserId) -> ProfileState {
        match self.ports.profiles.fetch_profile(user_id).await {
            Ok(Some(profile)) => {
                self.store_cached_profile(&profile);
                ProfileState::Ready(profile)
            }
            Ok(None) => {
                if let Err(error) = self.cache.clear_profile() {
                    warn!(%error, "failed to clear cached profile");
                }
                ProfileState::NotOnboarded
            }
            Err(error) => {
                warn!(%error, %user_id, "profile fetch failed");
                ProfileState::Unavailable
            }
        }
    }

    fn store_session(&self, session: &AuthSession) {
        if let Err(error) = self.cache.store_session(session) {
            warn!(%error, "failed to cache session");
        }
    }

    fn store_cached_profile(&self, profile: &UserProfile) {
        if let Err(error) = self.cache.store_profile(profile) {
            warn!(%error, "failed to cache profile");
        }
    }

    fn clear_cache(&self) {
        if let Err(error) = self.cache.clear() {
            warn!(%error, "failed to clear session cache");
        }
    }
}
