//! Startup search filters.
//!
//! One [`SearchFilters`] value drives three representations:
//!
//! - a URL query string, so a filtered listing can be bookmarked and shared;
//! - a [`StartupQuery`] handed to the repository;
//! - in-process post-filtering on joined rating summaries, which the
//!   repository cannot sort or filter on.
//!
//! Decoding the encoding of a normalised filter yields the same filter.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::domain::fields::normalise_list;
use crate::domain::startup::{TAG_LIST_MAX, TAG_MAX};
use crate::domain::{FundingStage, RatingSummary, Startup, StartupId};

pub const QUERY_MAX: usize = 200;
pub const SEARCH_LIMIT_DEFAULT: u32 = 50;
pub const MIN_RATING_MAX: f32 = 5.0;

const KEY_QUERY: &str = "q";
const KEY_INDUSTRY: &str = "industry";
const KEY_STAGE: &str = "stage";
const KEY_MIN_SCORE: &str = "min_score";
const KEY_MIN_RATING: &str = "min_rating";
const KEY_VERIFIED: &str = "verified";
const KEY_SORT: &str = "sort";

/// Ordering of search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Credibility,
    Rating,
    Upvotes,
    Newest,
    Name,
}

impl SortKey {
    pub const ALL: [Self; 5] = [
        Self::Credibility,
        Self::Rating,
        Self::Upvotes,
        Self::Newest,
        Self::Name,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credibility => "credibility",
            Self::Rating => "rating",
            Self::Upvotes => "upvotes",
            Self::Newest => "newest",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| value.to_owned())
    }
}

/// Problems decoding or normalising search filters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchFilterError {
    #[error("query must be at most {max} characters")]
    QueryTooLong { max: usize },
    #[error("unknown stage {0}")]
    UnknownStage(String),
    #[error("unknown sort key {0}")]
    UnknownSort(String),
    #[error("min_score must be an integer between 0 and 100, got {0}")]
    InvalidMinScore(String),
    #[error("min_rating must be a number between 0 and 5, got {0}")]
    InvalidMinRating(String),
    #[error("verified must be true or false, got {0}")]
    InvalidVerified(String),
    #[error("invalid industry filter: {0}")]
    InvalidIndustries(String),
}

impl SearchFilterError {
    /// Query-string key the error relates to.
    pub fn key(&self) -> &'static str {
        match self {
            Self::QueryTooLong { .. } => KEY_QUERY,
            Self::UnknownStage(_) => KEY_STAGE,
            Self::UnknownSort(_) => KEY_SORT,
            Self::InvalidMinScore(_) => KEY_MIN_SCORE,
            Self::InvalidMinRating(_) => KEY_MIN_RATING,
            Self::InvalidVerified(_) => KEY_VERIFIED,
            Self::InvalidIndustries(_) => KEY_INDUSTRY,
        }
    }
}

/// Filter state of the startup search page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub industries: Vec<String>,
    pub stages: Vec<FundingStage>,
    pub min_score: Option<u8>,
    pub min_rating: Option<f32>,
    pub verified_only: bool,
    pub sort: SortKey,
}

impl SearchFilters {
    /// Trim, de-duplicate, and bound the filter.
    pub fn normalised(self) -> Result<Self, SearchFilterError> {
        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| {
                if q.chars().count() > QUERY_MAX {
                    Err(SearchFilterError::QueryTooLong { max: QUERY_MAX })
                } else {
                    Ok(q.to_owned())
                }
            })
            .transpose()?;
        let industries = normalise_list("industry", &self.industries, TAG_LIST_MAX, TAG_MAX)
            .map_err(|err| SearchFilterError::InvalidIndustries(err.to_string()))?;
        let mut stages = Vec::with_capacity(self.stages.len());
        for stage in self.stages {
            if !stages.contains(&stage) {
                stages.push(stage);
            }
        }
        let min_score = match self.min_score {
            Some(score) if score > 100 => {
                return Err(SearchFilterError::InvalidMinScore(score.to_string()));
            }
            other => other,
        };
        let min_rating = match self.min_rating {
            Some(rating) if !(0.0..=MIN_RATING_MAX).contains(&rating) => {
                return Err(SearchFilterError::InvalidMinRating(rating.to_string()));
            }
            other => other,
        };
        Ok(Self {
            query,
            industries,
            stages,
            min_score,
            min_rating,
            verified_only: self.verified_only,
            sort: self.sort,
        })
    }

    /// Encode as a URL query string (without the leading `?`).
    ///
    /// Defaults are omitted so an empty filter encodes to an empty string.
    ///
    /// # Examples
    /// ```
    /// use ethaum::domain::{FundingStage, SearchFilters, SortKey};
    ///
    /// let filters = SearchFilters {
    ///     query: Some("ledger".into()),
    ///     stages: vec![FundingStage::Seed],
    ///     verified_only: true,
    ///     sort: SortKey::Rating,
    ///     ..SearchFilters::default()
    /// };
    /// assert_eq!(
    ///     filters.to_query_string(),
    ///     "q=ledger&stage=seed&verified=true&sort=rating"
    /// );
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(query) = &self.query {
            out.append_pair(KEY_QUERY, query);
        }
        for industry in &self.industries {
            out.append_pair(KEY_INDUSTRY, industry);
        }
        for stage in &self.stages {
            out.append_pair(KEY_STAGE, stage.as_str());
        }
        if let Some(score) = self.min_score {
            out.append_pair(KEY_MIN_SCORE, &score.to_string());
        }
        if let Some(rating) = self.min_rating {
            out.append_pair(KEY_MIN_RATING, &rating.to_string());
        }
        if self.verified_only {
            out.append_pair(KEY_VERIFIED, "true");
        }
        if self.sort != SortKey::default() {
            out.append_pair(KEY_SORT, self.sort.as_str());
        }
        out.finish()
    }

    /// Decode a URL query string, ignoring unknown keys.
    pub fn from_query_string(raw: &str) -> Result<Self, SearchFilterError> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                KEY_QUERY => filters.query = Some(value.into_owned()),
                KEY_INDUSTRY => filters.industries.push(value.into_owned()),
                KEY_STAGE => {
                    let stage = value
                        .parse::<FundingStage>()
                        .map_err(SearchFilterError::UnknownStage)?;
                    filters.stages.push(stage);
                }
                KEY_MIN_SCORE => {
                    let score = value
                        .parse::<u8>()
                        .map_err(|_| SearchFilterError::InvalidMinScore(value.to_string()))?;
                    filters.min_score = Some(score);
                }
                KEY_MIN_RATING => {
                    let rating = value
                        .parse::<f32>()
                        .ok()
                        .filter(|r| r.is_finite())
                        .ok_or_else(|| SearchFilterError::InvalidMinRating(value.to_string()))?;
                    filters.min_rating = Some(rating);
                }
                KEY_VERIFIED => {
                    filters.verified_only = match value.as_ref() {
                        "true" => true,
                        "false" => false,
                        other => return Err(SearchFilterError::InvalidVerified(other.to_owned())),
                    };
                }
                KEY_SORT => {
                    filters.sort = value.parse().map_err(SearchFilterError::UnknownSort)?;
                }
                _ => {}
            }
        }
        filters.normalised()
    }

    /// Repository query for these filters.
    ///
    /// Rating-based ordering and filtering happen after the rating join, so
    /// the repository orders by credibility in that case.
    pub fn startup_query(&self, limit: u32) -> StartupQuery {
        let order = match self.sort {
            SortKey::Credibility | SortKey::Rating => StartupOrder::Credibility,
            SortKey::Upvotes => StartupOrder::Upvotes,
            SortKey::Newest => StartupOrder::Newest,
            SortKey::Name => StartupOrder::Name,
        };
        StartupQuery {
            text: self.query.clone(),
            industries: self.industries.clone(),
            stages: self.stages.clone(),
            min_score: self.min_score,
            verified_only: self.verified_only,
            order,
            limit,
        }
    }

    /// Join rating summaries onto repository results and apply the
    /// rating-dependent filter and ordering.
    pub fn post_filter(
        &self,
        startups: Vec<Startup>,
        summaries: &HashMap<StartupId, RatingSummary>,
    ) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = startups
            .into_iter()
            .map(|startup| {
                let rating = summaries.get(&startup.id).copied();
                SearchHit { startup, rating }
            })
            .filter(|hit| match self.min_rating {
                None => true,
                Some(min) => hit.rating.is_some_and(|r| r.average >= min),
            })
            .collect();
        if self.sort == SortKey::Rating {
            hits.sort_by(|a, b| {
                let key = |hit: &SearchHit| hit.rating.map(|r| (r.average, r.count));
                key(b)
                    .partial_cmp(&key(a))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        hits
    }
}

/// Repository-side ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOrder {
    Credibility,
    Upvotes,
    Newest,
    Name,
}

/// Filters the repository evaluates in SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupQuery {
    /// Case-insensitive match on name, tagline, or description.
    pub text: Option<String>,
    pub industries: Vec<String>,
    pub stages: Vec<FundingStage>,
    pub min_score: Option<u8>,
    pub verified_only: bool,
    pub order: StartupOrder,
    pub limit: u32,
}

/// One search result with its rating summary, when it has reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub startup: Startup,
    pub rating: Option<RatingSummary>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{StartupProfile, UserId};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn full_filters() -> SearchFilters {
        SearchFilters {
            query: Some("supply chain & AI".into()),
            industries: vec!["Logistics".into(), "Fin Tech".into()],
            stages: vec![FundingStage::Seed, FundingStage::SeriesA],
            min_score: Some(60),
            min_rating: Some(3.5),
            verified_only: true,
            sort: SortKey::Upvotes,
        }
    }

    #[rstest]
    fn full_filter_round_trips(full_filters: SearchFilters) {
        let encoded = full_filters.to_query_string();
        let decoded = SearchFilters::from_query_string(&encoded).expect("decodes");
        assert_eq!(decoded, full_filters);
    }

    #[rstest]
    #[case::query(SearchFilters { query: Some("a=b&c".into()), ..SearchFilters::default() })]
    #[case::industries(SearchFilters { industries: vec!["AI".into(), "Health".into()], ..SearchFilters::default() })]
    #[case::stages(SearchFilters { stages: vec![FundingStage::Growth], ..SearchFilters::default() })]
    #[case::min_score(SearchFilters { min_score: Some(0), ..SearchFilters::default() })]
    #[case::min_rating(SearchFilters { min_rating: Some(4.25), ..SearchFilters::default() })]
    #[case::verified(SearchFilters { verified_only: true, ..SearchFilters::default() })]
    #[case::sort(SearchFilters { sort: SortKey::Name, ..SearchFilters::default() })]
    #[case::empty(SearchFilters::default())]
    fn each_field_round_trips(#[case] filters: SearchFilters) {
        let decoded =
            SearchFilters::from_query_string(&filters.to_query_string()).expect("decodes");
        assert_eq!(decoded, filters);
    }

    #[rstest]
    fn unknown_keys_are_ignored() {
        let decoded =
            SearchFilters::from_query_string("?utm_source=mail&sort=newest").expect("decodes");
        assert_eq!(decoded.sort, SortKey::Newest);
    }

    #[rstest]
    #[case("stage=ipo", "stage")]
    #[case("sort=random", "sort")]
    #[case("min_score=101", "min_score")]
    #[case("min_score=abc", "min_score")]
    #[case("min_rating=7", "min_rating")]
    #[case("min_rating=NaN", "min_rating")]
    #[case("verified=yes", "verified")]
    fn malformed_values_are_rejected(#[case] raw: &str, #[case] key: &str) {
        let err = SearchFilters::from_query_string(raw).expect_err("malformed");
        assert_eq!(err.key(), key);
    }

    #[rstest]
    fn decoding_normalises_input() {
        let decoded =
            SearchFilters::from_query_string("q=+ledger+&industry=AI&industry=ai&stage=seed&stage=seed")
                .expect("decodes");
        assert_eq!(decoded.query.as_deref(), Some("ledger"));
        assert_eq!(decoded.industries, vec!["AI".to_owned()]);
        assert_eq!(decoded.stages, vec![FundingStage::Seed]);
    }

    #[rstest]
    fn rating_sort_is_not_pushed_down() {
        let filters = SearchFilters {
            sort: SortKey::Rating,
            ..SearchFilters::default()
        };
        assert_eq!(filters.startup_query(10).order, StartupOrder::Credibility);
    }

    fn startup(name: &str) -> Startup {
        Startup {
            id: StartupId::random(),
            owner_id: UserId::random(),
            profile: StartupProfile {
                name: name.into(),
                tagline: None,
                description: None,
                industry: "AI".into(),
                stage: FundingStage::Seed,
                arr_range: None,
                team_size: None,
                founded_year: None,
                headquarters: None,
                website: None,
                logo_url: None,
                technologies: Vec::new(),
                features: Vec::new(),
            },
            credibility_score: 50,
            total_upvotes: 0,
            total_reviews: 0,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn post_filter_applies_min_rating_and_sort() {
        let low = startup("Low");
        let high = startup("High");
        let unrated = startup("Unrated");
        let mut summaries = HashMap::new();
        summaries.insert(low.id, RatingSummary { startup_id: low.id, average: 3.0, count: 4 });
        summaries.insert(high.id, RatingSummary { startup_id: high.id, average: 4.5, count: 2 });

        let filters = SearchFilters {
            min_rating: Some(2.0),
            sort: SortKey::Rating,
            ..SearchFilters::default()
        };
        let hits = filters.post_filter(vec![low, unrated.clone(), high], &summaries);
        let names: Vec<&str> = hits.iter().map(|h| h.startup.profile.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);

        let unfiltered = SearchFilters::default().post_filter(vec![unrated], &summaries);
        assert_eq!(unfiltered.len(), 1);
        assert!(unfiltered[0].rating.is_none());
    }
}
