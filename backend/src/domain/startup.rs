//! Startup profiles.
//!
//! ```text
//! StartupDraft (raw form input) --validate--> StartupProfile --persist--> Startup
//! ```
//!
//! Display fields (`credibility_score`, `total_upvotes`, `total_reviews`) are
//! maintained by the launch, review, and credibility flows, never by the form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::fields::{
    FieldError, FieldProblem, bounded, normalise_list, optional_text, optional_url, required_text,
};
use crate::domain::{StartupId, UserId};

pub const NAME_MAX: usize = 100;
pub const TAGLINE_MAX: usize = 160;
pub const DESCRIPTION_MAX: usize = 5000;
pub const TAG_LIST_MAX: usize = 20;
pub const TAG_MAX: usize = 50;
pub const FOUNDED_YEAR_MIN: i32 = 1900;
pub const FOUNDED_YEAR_MAX: i32 = 2100;

/// Funding stage of a startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    Growth,
}

impl FundingStage {
    pub const ALL: [Self; 6] = [
        Self::PreSeed,
        Self::Seed,
        Self::SeriesA,
        Self::SeriesB,
        Self::SeriesC,
        Self::Growth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreSeed => "pre_seed",
            Self::Seed => "seed",
            Self::SeriesA => "series_a",
            Self::SeriesB => "series_b",
            Self::SeriesC => "series_c",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FundingStage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == value)
            .ok_or_else(|| value.to_owned())
    }
}

/// Annual recurring revenue bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrRange {
    PreRevenue,
    UnderOneMillion,
    OneToFiveMillion,
    FiveToTwentyMillion,
    OverTwentyMillion,
}

impl ArrRange {
    pub const ALL: [Self; 5] = [
        Self::PreRevenue,
        Self::UnderOneMillion,
        Self::OneToFiveMillion,
        Self::FiveToTwentyMillion,
        Self::OverTwentyMillion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreRevenue => "pre_revenue",
            Self::UnderOneMillion => "under_1m",
            Self::OneToFiveMillion => "1m_5m",
            Self::FiveToTwentyMillion => "5m_20m",
            Self::OverTwentyMillion => "over_20m",
        }
    }
}

impl fmt::Display for ArrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == value)
            .ok_or_else(|| value.to_owned())
    }
}

/// Raw startup form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupDraft {
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: String,
    pub stage: String,
    pub arr_range: Option<String>,
    pub team_size: Option<i64>,
    pub founded_year: Option<i64>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
}

/// Validated, owner-editable startup attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupProfile {
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: String,
    pub stage: FundingStage,
    pub arr_range: Option<ArrRange>,
    pub team_size: Option<u32>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
    pub website: Option<Url>,
    pub logo_url: Option<Url>,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
}

impl StartupProfile {
    /// Whether the optional "about" fields are filled in.
    ///
    /// Used by credibility scoring as the baseline for verification.
    pub fn is_complete(&self) -> bool {
        self.tagline.is_some()
            && self.description.is_some()
            && self.website.is_some()
            && self.founded_year.is_some()
            && self.team_size.is_some()
    }
}

impl TryFrom<&StartupDraft> for StartupProfile {
    type Error = FieldError;

    fn try_from(draft: &StartupDraft) -> Result<Self, Self::Error> {
        let stage = draft
            .stage
            .trim()
            .parse::<FundingStage>()
            .map_err(|value| FieldError::new("stage", FieldProblem::UnknownValue(value)))?;
        let arr_range = draft
            .arr_range
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                value
                    .parse::<ArrRange>()
                    .map_err(|value| FieldError::new("arrRange", FieldProblem::UnknownValue(value)))
            })
            .transpose()?;
        let team_size = draft
            .team_size
            .map(|size| bounded("teamSize", size, 1, i64::from(u32::MAX)))
            .transpose()?
            .and_then(|size| u32::try_from(size).ok());
        let founded_year = draft
            .founded_year
            .map(|year| {
                bounded(
                    "foundedYear",
                    year,
                    i64::from(FOUNDED_YEAR_MIN),
                    i64::from(FOUNDED_YEAR_MAX),
                )
            })
            .transpose()?
            .and_then(|year| i32::try_from(year).ok());

        Ok(Self {
            name: required_text("name", &draft.name, 1, NAME_MAX)?,
            tagline: optional_text("tagline", draft.tagline.as_deref(), TAGLINE_MAX)?,
            description: optional_text("description", draft.description.as_deref(), DESCRIPTION_MAX)?,
            industry: required_text("industry", &draft.industry, 1, TAG_MAX)?,
            stage,
            arr_range,
            team_size,
            founded_year,
            headquarters: optional_text("headquarters", draft.headquarters.as_deref(), NAME_MAX)?,
            website: optional_url("website", draft.website.as_deref())?,
            logo_url: optional_url("logoUrl", draft.logo_url.as_deref())?,
            technologies: normalise_list("technologies", &draft.technologies, TAG_LIST_MAX, TAG_MAX)?,
            features: normalise_list("features", &draft.features, TAG_LIST_MAX, TAG_MAX)?,
        })
    }
}

/// Persisted startup with its display counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    pub id: StartupId,
    pub owner_id: UserId,
    pub profile: StartupProfile,
    pub credibility_score: u8,
    pub total_upvotes: u32,
    pub total_reviews: u32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
