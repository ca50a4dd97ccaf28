//! Credibility score blending.
//!
//! Four inputs, each clamped to `0..=100`, are blended with fixed weights:
//!
//! ```text
//! overall = round(0.35 * reviews + 0.25 * verification + 0.25 * engagement + 0.15 * longevity)
//! ```
//!
//! The score is display-only; no access decision depends on it.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};

use crate::domain::StartupId;

pub const REVIEW_WEIGHT: f64 = 0.35;
pub const VERIFICATION_WEIGHT: f64 = 0.25;
pub const ENGAGEMENT_WEIGHT: f64 = 0.25;
pub const LONGEVITY_WEIGHT: f64 = 0.15;

/// Number of reviews at which the review input carries its full weight.
pub const REVIEW_VOLUME_FULL: u32 = 10;
/// Years since founding at which longevity saturates.
pub const LONGEVITY_FULL_YEARS: i32 = 5;

const SCORE_MAX: u8 = 100;

fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    // Clamped to 0..=100 first, so the cast cannot truncate.
    value.round().clamp(0.0, f64::from(SCORE_MAX)) as u8
}

/// Blend inputs, each already in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredibilityInputs {
    pub reviews: u8,
    pub verification: u8,
    pub engagement: u8,
    pub longevity: u8,
}

impl CredibilityInputs {
    /// Build inputs, clamping each into `0..=100`.
    pub fn new(reviews: i64, verification: i64, engagement: i64, longevity: i64) -> Self {
        let clamp = |value: i64| u8::try_from(value.clamp(0, i64::from(SCORE_MAX))).unwrap_or(SCORE_MAX);
        Self {
            reviews: clamp(reviews),
            verification: clamp(verification),
            engagement: clamp(engagement),
            longevity: clamp(longevity),
        }
    }

    /// Weighted overall score.
    ///
    /// # Examples
    /// ```
    /// use ethaum::domain::CredibilityInputs;
    ///
    /// let inputs = CredibilityInputs::new(80, 100, 60, 40);
    /// // 28 + 25 + 15 + 6
    /// assert_eq!(inputs.overall(), 74);
    /// ```
    pub fn overall(&self) -> u8 {
        clamp_score(
            f64::from(self.reviews) * REVIEW_WEIGHT
                + f64::from(self.verification) * VERIFICATION_WEIGHT
                + f64::from(self.engagement) * ENGAGEMENT_WEIGHT
                + f64::from(self.longevity) * LONGEVITY_WEIGHT,
        )
    }
}

/// Raw facts about a startup from which inputs are derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibilitySignals {
    pub average_rating: Option<f32>,
    pub review_count: u32,
    pub is_verified: bool,
    pub profile_complete: bool,
    pub upvotes: u32,
    pub comments: u32,
    pub views: u32,
    pub founded_year: Option<i32>,
}

impl CredibilitySignals {
    /// Derive blend inputs as of `now`.
    pub fn inputs(&self, now: DateTime<Utc>) -> CredibilityInputs {
        let reviews = match self.average_rating {
            Some(average) if self.review_count > 0 => {
                let volume = f64::from(self.review_count.min(REVIEW_VOLUME_FULL))
                    / f64::from(REVIEW_VOLUME_FULL);
                f64::from(average) / 5.0 * 100.0 * volume
            }
            _ => 0.0,
        };
        let verification = if self.is_verified {
            100
        } else if self.profile_complete {
            30
        } else {
            0
        };
        let engagement = i64::from(self.upvotes)
            + 2 * i64::from(self.comments)
            + i64::from(self.views) / 20;
        let longevity = self
            .founded_year
            .map(|year| (now.year() - year).max(0))
            .map(|years| i64::from(years.min(LONGEVITY_FULL_YEARS)) * 100 / i64::from(LONGEVITY_FULL_YEARS))
            .unwrap_or(0);

        CredibilityInputs::new(
            i64::from(clamp_score(reviews)),
            verification,
            engagement,
            longevity,
        )
    }
}

/// Display tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredibilityTier {
    HighlyCredible,
    Trusted,
    Emerging,
    New,
}

impl CredibilityTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => Self::HighlyCredible,
            60..=79 => Self::Trusted,
            40..=59 => Self::Emerging,
            _ => Self::New,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighlyCredible => "Highly Credible",
            Self::Trusted => "Trusted",
            Self::Emerging => "Emerging",
            Self::New => "New",
        }
    }
}

impl fmt::Display for CredibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored credibility computation for one startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredibilityBreakdown {
    pub startup_id: StartupId,
    pub inputs: CredibilityInputs,
    pub overall: u8,
    pub computed_at: DateTime<Utc>,
}

impl CredibilityBreakdown {
    pub fn compute(startup_id: StartupId, inputs: CredibilityInputs, computed_at: DateTime<Utc>) -> Self {
        Self {
            startup_id,
            inputs,
            overall: inputs.overall(),
            computed_at,
        }
    }

    pub fn tier(&self) -> CredibilityTier {
        CredibilityTier::for_score(self.overall)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(0, 0, 0, 0, 0)]
    #[case(100, 100, 100, 100, 100)]
    #[case(80, 100, 60, 40, 74)]
    #[case(60, 30, 10, 20, 34)]
    #[case(-20, 250, 0, 0, 25)]
    fn overall_matches_weighted_formula(
        #[case] reviews: i64,
        #[case] verification: i64,
        #[case] engagement: i64,
        #[case] longevity: i64,
        #[case] expected: u8,
    ) {
        let inputs = CredibilityInputs::new(reviews, verification, engagement, longevity);
        assert_eq!(inputs.overall(), expected);
        let exact = f64::from(inputs.reviews) * 0.35
            + f64::from(inputs.verification) * 0.25
            + f64::from(inputs.engagement) * 0.25
            + f64::from(inputs.longevity) * 0.15;
        assert!((f64::from(expected) - exact).abs() <= 0.5);
    }

    #[rstest]
    #[case(100, CredibilityTier::HighlyCredible)]
    #[case(80, CredibilityTier::HighlyCredible)]
    #[case(79, CredibilityTier::Trusted)]
    #[case(60, CredibilityTier::Trusted)]
    #[case(40, CredibilityTier::Emerging)]
    #[case(39, CredibilityTier::New)]
    fn tiers_follow_thresholds(#[case] score: u8, #[case] tier: CredibilityTier) {
        assert_eq!(CredibilityTier::for_score(score), tier);
    }

    #[rstest]
    fn signals_derive_inputs(now: DateTime<Utc>) {
        let signals = CredibilitySignals {
            average_rating: Some(4.0),
            review_count: 5,
            is_verified: false,
            profile_complete: true,
            upvotes: 30,
            comments: 10,
            views: 400,
            founded_year: Some(2023),
        };
        let inputs = signals.inputs(now);
        assert_eq!(inputs.reviews, 40);
        assert_eq!(inputs.verification, 30);
        assert_eq!(inputs.engagement, 70);
        assert_eq!(inputs.longevity, 60);
    }

    #[rstest]
    fn signals_saturate(now: DateTime<Utc>) {
        let signals = CredibilitySignals {
            average_rating: Some(5.0),
            review_count: 40,
            is_verified: true,
            profile_complete: false,
            upvotes: 500,
            comments: 0,
            views: 0,
            founded_year: Some(1999),
        };
        let inputs = signals.inputs(now);
        assert_eq!(inputs, CredibilityInputs::new(100, 100, 100, 100));
    }

    #[rstest]
    fn missing_signals_score_zero(now: DateTime<Utc>) {
        let signals = CredibilitySignals {
            average_rating: None,
            review_count: 0,
            is_verified: false,
            profile_complete: false,
            upvotes: 0,
            comments: 0,
            views: 0,
            founded_year: Some(2030),
        };
        assert_eq!(signals.inputs(now).overall(), 0);
    }
}
