//! Startup/enterprise pairings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{EnterpriseId, MatchId, StartupId};

/// Participant-controlled status of a match.
///
/// Any status may replace any other; membership is the only rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Pending,
    Interested,
    Connected,
    Declined,
}

impl MatchStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Interested,
        Self::Connected,
        Self::Declined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Interested => "interested",
            Self::Connected => "connected",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| value.to_owned())
    }
}

/// Match score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchScore(u8);

impl MatchScore {
    pub const MAX: u8 = 100;

    /// Saturate `value` into the score range.
    pub fn saturating(value: i64) -> Self {
        let clamped = value.clamp(0, i64::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A pairing between one startup and one enterprise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub startup_id: StartupId,
    pub enterprise_id: EnterpriseId,
    pub match_score: MatchScore,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Whether either of the given profiles is a side of this match.
    pub fn involves(&self, startup: Option<StartupId>, enterprise: Option<EnterpriseId>) -> bool {
        startup == Some(self.startup_id) || enterprise == Some(self.enterprise_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pending", Ok(MatchStatus::Pending))]
    #[case("connected", Ok(MatchStatus::Connected))]
    #[case("Connected", Err("Connected".to_owned()))]
    #[case("archived", Err("archived".to_owned()))]
    fn statuses_parse_their_wire_names(
        #[case] raw: &str,
        #[case] expected: Result<MatchStatus, String>,
    ) {
        assert_eq!(raw.parse::<MatchStatus>(), expected);
    }

    #[rstest]
    #[case(-5, 0)]
    #[case(42, 42)]
    #[case(180, 100)]
    fn scores_saturate(#[case] raw: i64, #[case] expected: u8) {
        assert_eq!(MatchScore::saturating(raw).value(), expected);
    }

    #[rstest]
    fn participants_are_recognised() {
        let m = Match {
            id: MatchId::random(),
            startup_id: StartupId::random(),
            enterprise_id: EnterpriseId::random(),
            match_score: MatchScore::saturating(80),
            status: MatchStatus::Pending,
            created_at: Utc::now(),
        };
        assert!(m.involves(Some(m.startup_id), None));
        assert!(m.involves(None, Some(m.enterprise_id)));
        assert!(!m.involves(Some(StartupId::random()), None));
        assert!(!m.involves(None, None));
    }
}
