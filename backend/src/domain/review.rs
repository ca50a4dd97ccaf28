//! Startup reviews and per-startup rating summaries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::fields::{FieldError, FieldProblem, bounded, normalise_list, required_text};
use crate::domain::{EnterpriseId, FullName, ReviewId, StartupId, UserId};

pub const REVIEW_TITLE_MAX: usize = 120;
pub const REVIEW_CONTENT_MIN: usize = 10;
pub const REVIEW_CONTENT_MAX: usize = 5000;
pub const POINTS_MAX: usize = 10;
pub const POINT_LEN_MAX: usize = 200;

/// Star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self, FieldError> {
        let value = bounded("rating", value, 1, 5)?;
        u8::try_from(value)
            .map(Self)
            .map_err(|_| FieldError::new("rating", FieldProblem::OutOfRange { min: 1, max: 5 }))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Raw review form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: i64,
    pub title: String,
    pub content: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Validated review body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent {
    pub rating: Rating,
    pub title: String,
    pub content: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl TryFrom<&ReviewDraft> for ReviewContent {
    type Error = FieldError;

    fn try_from(draft: &ReviewDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            rating: Rating::new(draft.rating)?,
            title: required_text("title", &draft.title, 1, REVIEW_TITLE_MAX)?,
            content: required_text(
                "content",
                &draft.content,
                REVIEW_CONTENT_MIN,
                REVIEW_CONTENT_MAX,
            )?,
            pros: normalise_list("pros", &draft.pros, POINTS_MAX, POINT_LEN_MAX)?,
            cons: normalise_list("cons", &draft.cons, POINTS_MAX, POINT_LEN_MAX)?,
        })
    }
}

/// Persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub startup_id: StartupId,
    pub author_id: UserId,
    pub author_name: Option<FullName>,
    pub enterprise_id: Option<EnterpriseId>,
    pub content: ReviewContent,
    pub created_at: DateTime<Utc>,
}

/// Average rating and review count for one startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub startup_id: StartupId,
    pub average: f32,
    pub count: u32,
}

impl RatingSummary {
    /// Aggregate `(startup, rating)` pairs into one summary per startup.
    pub fn aggregate(ratings: &[(StartupId, Rating)]) -> HashMap<StartupId, RatingSummary> {
        let mut totals: HashMap<StartupId, (u32, u32)> = HashMap::new();
        for (startup_id, rating) in ratings {
            let entry = totals.entry(*startup_id).or_insert((0, 0));
            entry.0 += u32::from(rating.value());
            entry.1 += 1;
        }
        totals
            .into_iter()
            .map(|(startup_id, (sum, count))| {
                let average = sum as f32 / count as f32;
                (
                    startup_id,
                    RatingSummary {
                        startup_id,
                        average,
                        count,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(5, true)]
    #[case(6, false)]
    fn ratings_are_one_to_five(#[case] value: i64, #[case] ok: bool) {
        assert_eq!(Rating::new(value).is_ok(), ok);
    }

    #[rstest]
    fn short_review_content_is_rejected() {
        let draft = ReviewDraft {
            rating: 4,
            title: "Solid".into(),
            content: "Too short".into(),
            ..ReviewDraft::default()
        };
        let err = ReviewContent::try_from(&draft).expect_err("short content");
        assert_eq!(err.field, "content");
    }

    #[rstest]
    fn summaries_average_per_startup() {
        let a = StartupId::random();
        let b = StartupId::random();
        let rating = |v| Rating::new(v).expect("rating");
        let summaries =
            RatingSummary::aggregate(&[(a, rating(5)), (a, rating(4)), (b, rating(2))]);
        let summary_a = summaries.get(&a).expect("a summary");
        assert_eq!(summary_a.count, 2);
        assert!((summary_a.average - 4.5).abs() < f32::EPSILON);
        assert_eq!(summaries.get(&b).map(|s| s.count), Some(1));
    }
}
