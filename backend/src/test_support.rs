//! Test utilities shared by unit tests across the crate.
//!
//! Only compiled for `cargo test`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AuthSession, Email, FullName, FundingStage, Startup, StartupId, StartupProfile, UserId,
    UserProfile, UserType,
};

/// Instant every fixture clock reports.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at a fixed instant.
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub fn profile(user_type: UserType) -> UserProfile {
    UserProfile {
        id: UserId::random(),
        email: Email::new("ada@example.com").expect("fixture email"),
        full_name: FullName::new("Ada Lovelace").expect("fixture name"),
        avatar_url: None,
        user_type,
    }
}

/// Session for `user_id` valid for an hour past the fixture timestamp.
pub fn session_for(user_id: &UserId) -> AuthSession {
    AuthSession {
        user_id: user_id.clone(),
        email: Email::new("ada@example.com").expect("fixture email"),
        access_token: "access-token".to_owned(),
        refresh_token: "refresh-token".to_owned(),
        expires_at: fixture_timestamp() + Duration::hours(1),
    }
}

pub fn startup_owned_by(owner_id: &UserId) -> Startup {
    Startup {
        id: StartupId::random(),
        owner_id: owner_id.clone(),
        profile: StartupProfile {
            name: "Quantum Ledger".to_owned(),
            tagline: Some("Reconciliation at light speed".to_owned()),
            description: None,
            industry: "fintech".to_owned(),
            stage: FundingStage::SeriesA,
            arr_range: None,
            team_size: Some(12),
            founded_year: Some(2022),
            headquarters: None,
            website: None,
            logo_url: None,
            technologies: Vec::new(),
            features: Vec::new(),
        },
        credibility_score: 0,
        total_upvotes: 0,
        total_reviews: 0,
        is_verified: false,
        created_at: fixture_timestamp(),
    }
}
