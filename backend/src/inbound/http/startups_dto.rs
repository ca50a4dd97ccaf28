//! Request and response payloads for startup, review, and credibility
//! endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CredibilityBreakdown, RatingSummary, Review, ReviewDraft, SearchHit, Startup, StartupDraft,
};

#[derive(Debug, Deserialize)]
pub(super) struct StartupPath {
    pub(super) startup_id: String,
}

/// Startup profile form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartupRequest {
    #[schema(example = "Quantum Ledger")]
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    #[schema(example = "fintech")]
    pub industry: String,
    /// One of `pre_seed`, `seed`, `series_a`, `series_b`, `series_c`, `growth`.
    #[schema(example = "series_a")]
    pub stage: String,
    /// One of `pre_revenue`, `under_1m`, `1m_5m`, `5m_20m`, `over_20m`.
    pub arr_range: Option<String>,
    pub team_size: Option<i64>,
    pub founded_year: Option<i64>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<StartupRequest> for StartupDraft {
    fn from(value: StartupRequest) -> Self {
        Self {
            name: value.name,
            tagline: value.tagline,
            description: value.description,
            industry: value.industry,
            stage: value.stage,
            arr_range: value.arr_range,
            team_size: value.team_size,
            founded_year: value.founded_year,
            headquarters: value.headquarters,
            website: value.website,
            logo_url: value.logo_url,
            technologies: value.technologies,
            features: value.features,
        }
    }
}

/// Startup profile as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartupResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
    #[schema(value_type = String, format = "uuid")]
    pub owner_id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub industry: String,
    pub stage: String,
    pub arr_range: Option<String>,
    pub team_size: Option<u32>,
    pub founded_year: Option<i32>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub credibility_score: u8,
    pub total_upvotes: u32,
    pub total_reviews: u32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Startup> for StartupResponse {
    fn from(value: Startup) -> Self {
        let Startup {
            id,
            owner_id,
            profile,
            credibility_score,
            total_upvotes,
            total_reviews,
            is_verified,
            created_at,
        } = value;
        Self {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: profile.name,
            tagline: profile.tagline,
            description: profile.description,
            industry: profile.industry,
            stage: profile.stage.as_str().to_owned(),
            arr_range: profile.arr_range.map(|range| range.as_str().to_owned()),
            team_size: profile.team_size,
            founded_year: profile.founded_year,
            headquarters: profile.headquarters,
            website: profile.website.map(String::from),
            logo_url: profile.logo_url.map(String::from),
            technologies: profile.technologies,
            features: profile.features,
            credibility_score,
            total_upvotes,
            total_reviews,
            is_verified,
            created_at,
        }
    }
}

/// Paging and limit parameters for list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size, clamped to `1..=50`. Defaults to 20.
    pub limit: Option<u32>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummaryResponse {
    #[schema(example = 4.5)]
    pub average: f32,
    pub count: u32,
}

impl From<RatingSummary> for RatingSummaryResponse {
    fn from(value: RatingSummary) -> Self {
        Self {
            average: value.average,
            count: value.count,
        }
    }
}

/// One search result row.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHitResponse {
    pub startup: StartupResponse,
    pub rating: Option<RatingSummaryResponse>,
}

impl From<SearchHit> for SearchHitResponse {
    fn from(value: SearchHit) -> Self {
        Self {
            startup: value.startup.into(),
            rating: value.rating.map(Into::into),
        }
    }
}

/// Review form body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub rating: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

impl From<ReviewRequest> for ReviewDraft {
    fn from(value: ReviewRequest) -> Self {
        Self {
            rating: value.rating,
            title: value.title,
            content: value.content,
            pros: value.pros,
            cons: value.cons,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
    #[schema(value_type = String, format = "uuid")]
    pub startup_id: String,
    #[schema(value_type = String, format = "uuid")]
    pub author_id: String,
    pub author_name: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub enterprise_id: Option<String>,
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        Self {
            id: value.id.to_string(),
            startup_id: value.startup_id.to_string(),
            author_id: value.author_id.to_string(),
            author_name: value.author_name.map(String::from),
            enterprise_id: value.enterprise_id.map(|id| id.to_string()),
            rating: value.content.rating.value(),
            title: value.content.title,
            content: value.content.content,
            pros: value.content.pros,
            cons: value.content.cons,
            created_at: value.created_at,
        }
    }
}

/// Stored credibility breakdown with its display tier.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredibilityResponse {
    #[schema(value_type = String, format = "uuid")]
    pub startup_id: String,
    pub review_score: u8,
    pub verification_score: u8,
    pub engagement_score: u8,
    pub longevity_score: u8,
    #[schema(example = 74)]
    pub overall_score: u8,
    #[schema(example = "Trusted")]
    pub tier: String,
    pub computed_at: DateTime<Utc>,
}

impl From<CredibilityBreakdown> for CredibilityResponse {
    fn from(value: CredibilityBreakdown) -> Self {
        Self {
            startup_id: value.startup_id.to_string(),
            review_score: value.inputs.reviews,
            verification_score: value.inputs.verification,
            engagement_score: value.inputs.engagement,
            longevity_score: value.inputs.longevity,
            overall_score: value.overall,
            tier: value.tier().label().to_owned(),
            computed_at: value.computed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CredibilityInputs, StartupId, UserType};
    use crate::test_support::{fixture_timestamp, profile, startup_owned_by};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn startup_request_accepts_camel_case_and_defaults_lists() {
        let body: StartupRequest = serde_json::from_value(json!({
            "name": "Quantum Ledger",
            "industry": "fintech",
            "stage": "seed",
            "teamSize": 4,
            "logoUrl": "https://example.com/logo.png"
        }))
        .expect("request decodes");
        let draft = StartupDraft::from(body);
        assert_eq!(draft.team_size, Some(4));
        assert_eq!(draft.logo_url.as_deref(), Some("https://example.com/logo.png"));
        assert!(draft.technologies.is_empty());
    }

    #[rstest]
    fn startup_response_uses_wire_names_for_enums() {
        let owner = profile(UserType::Startup);
        let startup = startup_owned_by(&owner.id);
        let value = serde_json::to_value(StartupResponse::from(startup)).expect("serialise");
        assert_eq!(value["stage"], "series_a");
        assert_eq!(value["ownerId"], owner.id.to_string());
        assert_eq!(value["credibilityScore"], 0);
    }

    #[rstest]
    fn credibility_response_carries_the_tier_label() {
        let breakdown = CredibilityBreakdown::compute(
            StartupId::random(),
            CredibilityInputs::new(80, 100, 60, 40),
            fixture_timestamp(),
        );
        let response = CredibilityResponse::from(breakdown);
        assert_eq!(response.overall_score, 74);
        assert_eq!(response.tier, "Trusted");
    }
}
