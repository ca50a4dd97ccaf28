//! Explicit session state.
//!
//! ```text
//! Uninitialized --initialize--> Loading --> Authenticated | Anonymous
//! Anonymous --sign_in/sign_up--> Authenticated
//! Authenticated --sign_out/SignedOut event/type mismatch--> Anonymous
//! ```

use crate::domain::{AuthSession, UserId, UserProfile};

/// Outcome of the most recent profile fetch for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    /// The profile row exists and was fetched.
    Ready(UserProfile),
    /// The provider knows the user but no profile row exists yet.
    NotOnboarded,
    /// The fetch failed; the row may or may not exist.
    Unavailable,
}

impl ProfileState {
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Ready(profile) => Some(profile),
            Self::NotOnboarded | Self::Unavailable => None,
        }
    }
}

/// Who is signed in and what is known about their profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    /// Startup reconciliation is running. The cached profile, if any, is
    /// exposed for first paint only.
    Loading { cached_profile: Option<UserProfile> },
    Authenticated {
        session: AuthSession,
        profile: ProfileState,
    },
    Anonymous,
}

impl SessionState {
    /// True until startup reconciliation has settled.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Uninitialized | Self::Loading { .. })
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Authenticated { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.session().map(|session| &session.user_id)
    }

    /// Profile to render: the fetched one when authenticated, the cached one
    /// while loading.
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Loading { cached_profile } => cached_profile.as_ref(),
            Self::Authenticated { profile, .. } => profile.profile(),
            Self::Uninitialized | Self::Anonymous => None,
        }
    }
}
