//! Driven port for the locally persisted session cache.
//!
//! The cache exists only so a returning user sees their profile before the
//! network answers. It is best effort: every successful fetch overwrites it
//! and callers never prefer it over a fetch.
//!
//! The trait is synchronous and carries no `Send` bound so request-scoped
//! stores, such as the actix cookie session, can implement it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{AuthSession, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session cache adapters.
    pub enum SessionCacheError {
        /// The backing store could not be read or written.
        Io { message: String } => "session cache io failed: {message}",
        /// A stored entry could not be decoded.
        Corrupt { message: String } => "session cache entry corrupt: {message}",
    }
}

/// Local store for the current session and its profile snapshot.
#[cfg_attr(test, mockall::automock)]
pub trait SessionCache {
    /// Read the cached session, if any.
    fn load_session(&self) -> Result<Option<AuthSession>, SessionCacheError>;

    /// Overwrite the cached session.
    fn store_session(&self, session: &AuthSession) -> Result<(), SessionCacheError>;

    /// Read the cached profile snapshot, if any.
    fn load_profile(&self) -> Result<Option<UserProfile>, SessionCacheError>;

    /// Overwrite the cached profile snapshot.
    fn store_profile(&self, profile: &UserProfile) -> Result<(), SessionCacheError>;

    /// Remove the cached profile snapshot only.
    fn clear_profile(&self) -> Result<(), SessionCacheError>;

    /// Remove every cached entry.
    fn clear(&self) -> Result<(), SessionCacheError>;
}

#[derive(Debug, Default, Clone)]
struct CacheEntries {
    session: Option<AuthSession>,
    profile: Option<UserProfile>,
}

/// Process-local cache, used by tests and by servers without a local store.
#[derive(Debug, Default)]
pub struct InMemorySessionCache {
    entries: Mutex<CacheEntries>,
}

impl InMemorySessionCache {
    /// Create a cache seeded with a session and profile.
    pub fn seeded(session: Option<AuthSession>, profile: Option<UserProfile>) -> Self {
        Self {
            entries: Mutex::new(CacheEntries { session, profile }),
        }
    }

    fn entries(&self) -> MutexGuard<'_, CacheEntries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionCache for InMemorySessionCache {
    fn load_session(&self) -> Result<Option<AuthSession>, SessionCacheError> {
        Ok(self.entries().session.clone())
    }

    fn store_session(&self, session: &AuthSession) -> Result<(), SessionCacheError> {
        self.entries().session = Some(session.clone());
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<UserProfile>, SessionCacheError> {
        Ok(self.entries().profile.clone())
    }

    fn store_profile(&self, profile: &UserProfile) -> Result<(), SessionCacheError> {
        self.entries().profile = Some(profile.clone());
        Ok(())
    }

    fn clear_profile(&self) -> Result<(), SessionCacheError> {
        self.entries().profile = None;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionCacheError> {
        *self.entries() = CacheEntries::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, FullName, UserId, UserType};
    use chrono::Utc;
    use rstest::rstest;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::random(),
            email: Email::new("ada@example.com").expect("email"),
            full_name: FullName::new("Ada Lovelace").expect("name"),
            avatar_url: None,
            user_type: UserType::Startup,
        }
    }

    #[rstest]
    fn clear_profile_keeps_session() {
        let profile = profile();
        let session = AuthSession {
            user_id: profile.id.clone(),
            email: profile.email.clone(),
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now(),
        };
        let cache = InMemorySessionCache::seeded(Some(session.clone()), Some(profile));

        cache.clear_profile().expect("clear profile");
        assert_eq!(cache.load_session().expect("load"), Some(session));
        assert_eq!(cache.load_profile().expect("load"), None);

        cache.clear().expect("clear");
        assert_eq!(cache.load_session().expect("load"), None);
    }
}
